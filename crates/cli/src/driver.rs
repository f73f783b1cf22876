//! The auto-advance loop behind `bto run`.

use bto_core::{Error, Scheduler, State, Step, StepReport};

/// Step `scheduler` until it completes, handing every report to `on_step`.
///
/// Returns the number of steps taken. A run that finishes on exactly its
/// `max_steps`-th step succeeds.
///
/// # Errors
///
/// Returns [`Error::StepLimitExceeded`] if the run is still going after
/// `max_steps` steps.
pub fn drive<F>(scheduler: &mut Scheduler, max_steps: u64, mut on_step: F) -> Result<u64, Error>
where
    F: FnMut(&Scheduler, &StepReport),
{
    let mut taken = 0;
    while scheduler.state() == State::Running {
        if taken == max_steps {
            return Err(Error::StepLimitExceeded { limit: max_steps });
        }
        if let Step::Advanced(report) = scheduler.step() {
            taken += 1;
            on_step(scheduler, &report);
        }
    }
    Ok(taken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(tokens: &[&str]) -> Scheduler {
        let mut scheduler = Scheduler::new();
        scheduler.load(tokens).unwrap();
        scheduler
    }

    #[test]
    fn test_finishing_on_the_last_allowed_step() {
        let mut scheduler = loaded(&["r1(x)", "c1"]);
        let mut seen = Vec::new();
        let taken = drive(&mut scheduler, 2, |_, report| seen.push(report.step)).unwrap();
        assert_eq!(taken, 2);
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(scheduler.state(), State::Completed);
    }

    #[test]
    fn test_limit_below_history_length() {
        let mut scheduler = loaded(&["r1(x)", "c1"]);
        let err = drive(&mut scheduler, 1, |_, _| {}).unwrap_err();
        assert_eq!(err, Error::StepLimitExceeded { limit: 1 });
        assert_eq!(scheduler.steps_taken(), 1);
    }

    #[test]
    fn test_empty_history_takes_no_steps() {
        let mut scheduler = loaded(&[]);
        assert_eq!(drive(&mut scheduler, 0, |_, _| {}), Ok(0));
        assert_eq!(scheduler.state(), State::Completed);
    }

    #[test]
    fn test_callback_sees_state_after_step() {
        let mut scheduler = loaded(&["r1(y)", "r2(y)", "w1(y)", "c2", "c1"]);
        let mut aborts = 0;
        drive(&mut scheduler, 100, |scheduler, _| {
            aborts = scheduler.aborted_ids().len();
        })
        .unwrap();
        assert_eq!(aborts, 1);
    }
}
