use crate::member::{Member, WeeklyAvailability};
use crate::time::{Cell, Day, DAYS, SLOTS_PER_DAY};
use log::trace;

#[cfg(feature = "serde")]
use serde::Serialize;

/// How many members are free at each cell of the week
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FrequencyMatrix {
    counts: [[u32; SLOTS_PER_DAY]; DAYS],
    members: u32,
}

impl FrequencyMatrix {
    /// Number of members folded into this matrix.
    /// Members without a usable schedule are counted too.
    pub fn members(&self) -> u32 {
        self.members
    }

    /// Count of free members at a cell. Zero outside of the grid.
    pub fn get(&self, day: Day, slot: usize) -> u32 {
        self.counts[day.index()]
            .get(slot)
            .copied()
            .unwrap_or_default()
    }

    pub fn at(&self, cell: Cell) -> u32 {
        self.get(cell.day, cell.slot)
    }

    /// Every member is free at this cell
    pub fn is_unanimous(&self, cell: Cell) -> bool {
        self.at(cell) == self.members
    }

    /// Highest count found anywhere in the week
    pub fn peak(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .max()
            .unwrap_or_default()
    }

    /// Folds another member's availability into the counts
    pub fn add(&mut self, availability: &WeeklyAvailability) {
        self.members += 1;
        for (cell, free) in availability.cells() {
            if free {
                self.counts[cell.day.index()][cell.slot] += 1;
            }
        }
    }
}

pub trait Tally {
    fn tally(self) -> FrequencyMatrix;
}

impl<'a, T> Tally for T
where
    T: Iterator<Item = &'a Member>,
{
    /// Counts, per cell, how many of the members are free.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::frequency::Tally;
    /// use treffpunkt_libs::member::{Member, WeeklyAvailability};
    /// use treffpunkt_libs::time::Day;
    ///
    /// let members = vec![
    ///     Member::with_availability("1", &WeeklyAvailability::all_open()),
    ///     Member::with_availability("2", &WeeklyAvailability::all_open()),
    ///     Member::new("3", None),
    /// ];
    ///
    /// let matrix = members.iter().tally();
    /// assert_eq!(matrix.members(), 3);
    /// assert_eq!(matrix.get(Day::Friday, 10), 2);
    /// ```
    fn tally(self) -> FrequencyMatrix {
        self.fold(FrequencyMatrix::default(), |mut matrix, member| {
            trace!("Tallying member {}", member.id);
            matrix.add(&member.availability());
            matrix
        })
    }
}
