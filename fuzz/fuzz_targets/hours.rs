#![no_main]
use libfuzzer_sys::fuzz_target;
use treffpunkt_libs::{
    hours::{DayMapping, HoursGrid, OpenInterval},
    time::{Day, SLOTS_PER_DAY},
};

fuzz_target!(|intervals: Vec<OpenInterval>| {
    let grid = HoursGrid::from_intervals(&intervals, &DayMapping::MONDAY_FIRST);

    for &day in Day::ALL.iter() {
        for slot in 0..SLOTS_PER_DAY {
            let covered = intervals.iter().any(|interval| {
                DayMapping::MONDAY_FIRST.day(interval.day) == Some(day)
                    && interval.slots().map_or(false, |slots| slots.contains(&slot))
            });

            assert_eq!(
                grid.is_open(day, slot),
                covered,
                "{} slot {} disagrees with {:?}",
                day,
                slot,
                intervals
            );
        }

        assert!(!grid.is_open(day, SLOTS_PER_DAY), "Read past the end of {}", day);
    }
});
