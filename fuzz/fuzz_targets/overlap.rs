#![no_main]
use availability_libs::interval::MeetingSample;
use availability_libs::overlap::{best_meeting_times, peak_overlap_windows};
use availability_libs::time::intersects;
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

fuzz_target!(|data: MeetingSample| {
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

    for a in data.intervals.iter() {
        assert!(intersects(a, a), "Interval does not overlap itself: {:?}", a);
        for b in data.intervals.iter() {
            assert_eq!(intersects(a, b), intersects(b, a), "Asymmetric overlap");
        }
    }

    let windows = best_meeting_times(&data.meeting_id, &data.intervals)
        .expect("Sampled intervals all belong to the sampled meeting");

    assert_eq!(
        windows,
        best_meeting_times(&data.meeting_id, &data.intervals).unwrap(),
        "Ranking is not repeatable"
    );

    for window in windows.iter() {
        assert!(window.count() > 1, "Singleton window reported");
        assert_eq!(window.count(), window.member_ids().len());
        assert!(
            window.member_ids().windows(2).all(|pair| pair[0] < pair[1]),
            "Members are not sorted and unique"
        );
        for member in window.member_ids() {
            assert!(
                data.intervals.iter().any(|i| i.member_id() == member
                    && i.start() == window.start()
                    && i.end() == window.end()),
                "{} never picked {:?}",
                member,
                window
            );
        }
    }

    assert!(
        windows
            .windows(2)
            .all(|pair| pair[0].count() > pair[1].count()
                || (pair[0].count() == pair[1].count() && pair[0].start() <= pair[1].start())),
        "Windows are not ranked"
    );

    let swept = peak_overlap_windows(&data.meeting_id, &data.intervals).unwrap();
    let mut seen = HashSet::new();
    for window in swept.iter() {
        assert!(window.count() > 1, "Singleton segment reported");
        assert!(window.start() < window.end(), "Empty segment reported");
        assert!(seen.insert((window.start(), window.end())), "Duplicate segment");
        for member in window.member_ids() {
            assert!(
                data.intervals
                    .iter()
                    .any(|i| i.member_id() == member && intersects(i, window)),
                "{} is not available during {:?}",
                member,
                window
            );
        }
    }
});
