use crate::frequency::FrequencyMatrix;
use crate::hours::HoursGrid;
use crate::time::{Cell, BLOCK_LEN, CELLS};
use log::{debug, trace};

/// Where the selector is in its single forward pass over the week
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectorState {
    /// Looking at the cell at `position` of the day-major scan, with
    /// `run_length` unanimous cells directly before it on the same day
    Scanning { position: usize, run_length: usize },
    /// A unanimous block starting at `start` waits for validation
    CandidateFound { start: Cell },
    /// The block starting at `start` is being checked against opening hours
    Validating { start: Cell },
    Accepted { start: Cell },
    Exhausted,
}

impl SelectorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SelectorState::Accepted { .. } | SelectorState::Exhausted)
    }
}

/// Finds the first block of `BLOCK_LEN` slots on one day where every member is
/// free and the restaurant is open.
///
/// Cells are visited strictly in order and never twice, so a full run costs at
/// most `CELLS` visits however many candidates get rejected.
#[derive(Debug, Clone)]
pub struct SlotSelector<'m> {
    matrix: &'m FrequencyMatrix,
    required: u32,
    state: SelectorState,
    visited: usize,
    rejected: usize,
}

impl<'m> SlotSelector<'m> {
    pub fn new(matrix: &'m FrequencyMatrix) -> SlotSelector<'m> {
        SlotSelector {
            matrix,
            required: matrix.members(),
            state: SelectorState::Scanning {
                position: 0,
                run_length: 0,
            },
            visited: 0,
            rejected: 0,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Cells looked at so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Candidates turned down because the restaurant was closed
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Advances by exactly one transition and returns the new state.
    ///
    /// `hours` is only read when leaving `Validating`; scanning for a
    /// candidate does not need it. Terminal states do not move.
    pub fn step(&mut self, hours: Option<&HoursGrid>) -> SelectorState {
        self.state = match self.state {
            SelectorState::Scanning {
                position,
                run_length,
            } => self.scan(position, run_length),
            SelectorState::CandidateFound { start } => SelectorState::Validating { start },
            SelectorState::Validating { start } => match hours {
                Some(hours) => self.validate(start, hours),
                None => SelectorState::Validating { start },
            },
            terminal => terminal,
        };

        self.state
    }

    fn scan(&mut self, position: usize, run_length: usize) -> SelectorState {
        let cell = match Cell::from_flat(position) {
            Some(cell) => cell,
            None => {
                debug!(
                    "No unanimous block left after {} cells, {} rejected",
                    self.visited, self.rejected
                );
                return SelectorState::Exhausted;
            }
        };

        self.visited += 1;

        // Runs never carry over from the previous day
        let run_length = if cell.slot == 0 { 0 } else { run_length };
        let run_length = if self.matrix.at(cell) == self.required {
            run_length + 1
        } else {
            0
        };

        trace!("Scanned {:?}, run length {}", cell, run_length);

        if run_length == BLOCK_LEN {
            let start = Cell::new(cell.day, cell.slot + 1 - BLOCK_LEN);
            debug!("Candidate block {} slot {}", start.day, start.slot);
            SelectorState::CandidateFound { start }
        } else {
            SelectorState::Scanning {
                position: position + 1,
                run_length,
            }
        }
    }

    fn validate(&mut self, start: Cell, hours: &HoursGrid) -> SelectorState {
        if hours.is_block_open(start.day, start.slot, BLOCK_LEN) {
            return SelectorState::Accepted { start };
        }

        self.rejected += 1;
        debug!(
            "Restaurant closed during {} slot {}, resuming scan",
            start.day, start.slot
        );

        SelectorState::Scanning {
            position: start.flat() + BLOCK_LEN,
            run_length: 0,
        }
    }

    /// Scans until a candidate is found or the week is exhausted.
    /// Returns the candidate's start, leaving the selector in `CandidateFound`.
    pub fn next_candidate(&mut self) -> Option<Cell> {
        loop {
            match self.state {
                SelectorState::CandidateFound { start } => return Some(start),
                SelectorState::Scanning { .. } => {
                    self.step(None);
                }
                _ => return None,
            }
        }
    }

    /// Validates candidates against `hours`, scanning on past rejections,
    /// until a terminal state is reached.
    pub fn run(&mut self, hours: &HoursGrid) -> Option<Cell> {
        while !self.state.is_terminal() {
            self.step(Some(hours));
        }

        match self.state {
            SelectorState::Accepted { start } => Some(start),
            _ => None,
        }
    }
}
