#![no_main]
use libfuzzer_sys::fuzz_target;
use treffpunkt_libs::{
    frequency::Tally,
    hours::{DayMapping, Restaurant},
    matcher::{MatchError, Matcher},
    member::Member,
    time::{BLOCK_LEN, CELLS},
};

fuzz_target!(|data: (Vec<Member>, Restaurant)| {
    #[cfg(feature = "log")]
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply();

    let (members, restaurant) = data;
    let matcher = Matcher::default();

    match matcher.run(&members, &restaurant) {
        Ok(outcome) => {
            assert!(outcome.visited <= CELLS, "Scanned {} cells", outcome.visited);

            let matrix = members.iter().tally();
            let hours = restaurant
                .hours_grid(&DayMapping::MONDAY_FIRST)
                .expect("Accepted a restaurant without hours");
            let start = outcome.start;

            for slot in start.slot..start.slot + BLOCK_LEN {
                assert_eq!(
                    matrix.get(start.day, slot),
                    members.len() as u32,
                    "Block {:?} is not unanimous",
                    start
                );
                assert!(hours.is_open(start.day, slot), "Closed during {:?}", start);
            }
        }
        Err(MatchError::HoursUnavailable) => {
            assert!(restaurant.business_hours.map_or(true, |h| h.is_empty()));
        }
        Err(MatchError::NoCommonAvailability) => {}
    }
});
