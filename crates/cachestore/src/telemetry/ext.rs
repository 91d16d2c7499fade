// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Extension traits for timing operations.

use std::time::Duration;

use tick::Clock;

/// Result of a timed async operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timed<R> {
    pub result: R,
    pub duration: Duration,
}

pub(crate) trait ClockExt {
    /// Runs `f` and measures how long it took on this clock.
    fn timed<F, R>(&self, f: F) -> impl Future<Output = Timed<R>>
    where
        F: Future<Output = R>;
}

impl ClockExt for Clock {
    async fn timed<F, R>(&self, f: F) -> Timed<R>
    where
        F: Future<Output = R>,
    {
        let stopwatch = self.stopwatch();
        let result = f.await;
        Timed {
            result,
            duration: stopwatch.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_measures_logical_duration() {
        futures::executor::block_on(async {
            let control = tick::ClockControl::new();
            let clock = control.to_clock();

            let timed = clock
                .timed(async {
                    control.advance(Duration::from_millis(100));
                    42
                })
                .await;

            assert_eq!(timed.result, 42);
            assert_eq!(timed.duration, Duration::from_millis(100));
        });
    }
}
