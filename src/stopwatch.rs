//! Elapsed-time reporting on a side thread.
//!
//! The stopwatch thread calls its report closure once at start and then once
//! per interval with [`Lap::Running`], and a final time with [`Lap::Done`]
//! after [`Stopwatch::stop`]. Stopping is a message on a channel; the thread
//! waits on that channel with a timeout, so it wakes promptly on stop instead
//! of finishing a sleep.
//!
//! Dropping a running [`Stopwatch`] without calling `stop` also ends the
//! thread (the channel disconnects), but does not wait for it.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One report from the stopwatch thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lap {
    Running(Duration),
    Done(Duration),
}

pub struct Stopwatch {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Stopwatch {
    /// Start timing now and report every `interval`.
    pub fn start<F>(interval: Duration, mut report: F) -> Self
    where
        F: FnMut(Lap) + Send + 'static,
    {
        let started = Instant::now();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            loop {
                report(Lap::Running(started.elapsed()));
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            report(Lap::Done(started.elapsed()));
        });
        Self { stop_tx, handle }
    }

    /// Signal the thread and wait for its final report.
    pub fn stop(self) {
        // The thread only exits after a stop message or disconnect, so a
        // failed send means it is already gone.
        self.stop_tx.send(()).ok();
        if let Err(panic) = self.handle.join() {
            std::panic::resume_unwind(panic);
        }
    }
}

/// Seconds with two decimals, as shown in progress lines.
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (Arc<Mutex<Vec<Lap>>>, impl FnMut(Lap) + Send + 'static) {
        let laps = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&laps);
        (laps, move |lap| sink.lock().unwrap().push(lap))
    }

    #[test]
    fn reports_immediately_then_done_on_stop() {
        let (laps, report) = recording();
        let watch = Stopwatch::start(Duration::from_secs(60), report);
        watch.stop();

        let laps = laps.lock().unwrap();
        assert_eq!(laps.len(), 2);
        assert!(matches!(laps[0], Lap::Running(_)));
        assert!(matches!(laps[1], Lap::Done(_)));
    }

    #[test]
    fn stop_does_not_wait_for_interval() {
        let (_laps, report) = recording();
        let watch = Stopwatch::start(Duration::from_secs(60), report);
        let before = Instant::now();
        watch.stop();
        assert!(before.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn ticks_repeat_while_running() {
        let (laps, report) = recording();
        let watch = Stopwatch::start(Duration::from_millis(5), report);
        thread::sleep(Duration::from_millis(60));
        watch.stop();

        let laps = laps.lock().unwrap();
        let running = laps.iter().filter(|l| matches!(l, Lap::Running(_))).count();
        assert!(running >= 2, "only {running} ticks");
        assert!(matches!(laps.last(), Some(Lap::Done(_))));
    }

    #[test]
    fn laps_never_go_backwards() {
        let (laps, report) = recording();
        let watch = Stopwatch::start(Duration::from_millis(2), report);
        thread::sleep(Duration::from_millis(20));
        watch.stop();

        let times: Vec<Duration> = laps
            .lock()
            .unwrap()
            .iter()
            .map(|l| match l {
                Lap::Running(d) | Lap::Done(d) => *d,
            })
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn done_lap_covers_time_running() {
        let (laps, report) = recording();
        let watch = Stopwatch::start(Duration::from_secs(1), report);
        thread::sleep(Duration::from_millis(10));
        watch.stop();

        let laps = laps.lock().unwrap();
        assert!(matches!(laps.last(), Some(Lap::Done(d)) if *d >= Duration::from_millis(10)));
    }

    #[test]
    fn format_seconds_two_decimals() {
        assert_eq!(format_seconds(Duration::from_millis(0)), "0.00");
        assert_eq!(format_seconds(Duration::from_millis(1234)), "1.23");
        assert_eq!(format_seconds(Duration::from_secs(75)), "75.00");
    }
}
