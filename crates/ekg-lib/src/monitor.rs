use crate::error::EkgResult;
use crate::metrics::rate::{EstimatorConfig, RateEstimate, RateEstimator};
use crate::signal::SampleSequence;
use crate::synth::{SignalGenerator, UniformSource};

/// Change notification published by the monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorEvent {
    /// The sample sequence was replaced wholesale.
    SequenceReplaced { len: usize },
    /// The derived heart-rate value changed.
    RateChanged { bpm: f64 },
}

type Observer = Box<dyn FnMut(&MonitorEvent)>;

/// Owns the current sample sequence and the heart-rate estimate derived
/// from it.
///
/// Replacing the sequence is the only mutation. Every replacement publishes
/// `SequenceReplaced` to the registered observers, then `RateChanged` when
/// the recomputed value differs from the previous one. Dispatch is
/// synchronous, on the caller's thread, in subscription order.
pub struct HeartRateMonitor {
    estimator: RateEstimator,
    sequence: SampleSequence,
    estimate: RateEstimate,
    observers: Vec<Observer>,
}

impl HeartRateMonitor {
    /// Rejects an invalid estimator config before any estimate is computed.
    pub fn new(config: EstimatorConfig) -> EkgResult<Self> {
        let estimator = RateEstimator::new(config)?;
        let sequence = SampleSequence::from_data(Vec::new());
        let estimate = estimator.estimate(sequence.values());
        Ok(Self {
            estimator,
            sequence,
            estimate,
            observers: Vec::new(),
        })
    }

    /// Register an observer for subsequent replacements.
    pub fn subscribe(&mut self, observer: impl FnMut(&MonitorEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Install a new sequence wholesale and recompute the estimate.
    pub fn replace_sequence(&mut self, sequence: SampleSequence) {
        self.sequence = sequence;
        self.publish(MonitorEvent::SequenceReplaced {
            len: self.sequence.len(),
        });
        let next = self.estimator.estimate(self.sequence.values());
        let changed = next.bpm != self.estimate.bpm;
        self.estimate = next;
        if changed {
            self.publish(MonitorEvent::RateChanged { bpm: next.bpm });
        }
    }

    /// Draw a fresh sequence from `generator` and install it.
    pub fn regenerate<S: UniformSource>(&mut self, generator: &mut SignalGenerator<S>) {
        self.replace_sequence(generator.generate());
    }

    pub fn sequence(&self) -> &SampleSequence {
        &self.sequence
    }

    pub fn heart_rate(&self) -> f64 {
        self.estimate.bpm
    }

    pub fn estimate(&self) -> RateEstimate {
        self.estimate
    }

    pub fn estimator_config(&self) -> &EstimatorConfig {
        self.estimator.config()
    }

    fn publish(&mut self, event: MonitorEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_monitor() -> (HeartRateMonitor, Rc<RefCell<Vec<MonitorEvent>>>) {
        let mut monitor = HeartRateMonitor::new(EstimatorConfig::default()).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        monitor.subscribe(move |event| sink.borrow_mut().push(*event));
        (monitor, events)
    }

    #[test]
    fn fresh_monitor_reports_zero() {
        let monitor = HeartRateMonitor::new(EstimatorConfig::default()).unwrap();
        assert_eq!(monitor.heart_rate(), 0.0);
        assert!(monitor.sequence().is_empty());
    }

    #[test]
    fn replacement_publishes_sequence_and_rate_events() {
        let (mut monitor, events) = recording_monitor();
        monitor.replace_sequence(SampleSequence::from_data(vec![0.5, 0.9, 0.3, 0.85, 0.2]));
        assert_eq!(monitor.heart_rate(), 12.0);
        assert_eq!(
            events.borrow().as_slice(),
            &[
                MonitorEvent::SequenceReplaced { len: 5 },
                MonitorEvent::RateChanged { bpm: 12.0 },
            ]
        );
    }

    #[test]
    fn unchanged_rate_publishes_only_the_replacement() {
        let (mut monitor, events) = recording_monitor();
        monitor.replace_sequence(SampleSequence::from_data(vec![0.5, 0.9, 0.2]));
        events.borrow_mut().clear();
        // a different sequence with the same single crossing
        monitor.replace_sequence(SampleSequence::from_data(vec![0.1, 0.95, 0.4, 0.3]));
        assert_eq!(
            events.borrow().as_slice(),
            &[MonitorEvent::SequenceReplaced { len: 4 }]
        );
    }

    #[test]
    fn observers_run_in_subscription_order() {
        let mut monitor = HeartRateMonitor::new(EstimatorConfig::default()).unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let sink = Rc::clone(&order);
            monitor.subscribe(move |event| {
                if matches!(event, MonitorEvent::SequenceReplaced { .. }) {
                    sink.borrow_mut().push(tag);
                }
            });
        }
        monitor.replace_sequence(SampleSequence::from_data(vec![0.2, 0.2]));
        assert_eq!(order.borrow().as_slice(), &["first", "second"]);
    }

    #[test]
    fn invalid_estimator_config_is_rejected_up_front() {
        let config = EstimatorConfig {
            window_s: 0.0,
            ..EstimatorConfig::default()
        };
        assert!(HeartRateMonitor::new(config).is_err());
    }

    #[test]
    fn regenerate_installs_a_generated_sequence() {
        use crate::synth::WaveformConfig;

        let (mut monitor, events) = recording_monitor();
        let config = WaveformConfig {
            count: 32,
            seed: Some(99),
            ..WaveformConfig::default()
        };
        let mut generator = SignalGenerator::from_config(config).unwrap();
        monitor.regenerate(&mut generator);
        assert_eq!(monitor.sequence().len(), 32);
        assert!(matches!(
            events.borrow()[0],
            MonitorEvent::SequenceReplaced { len: 32 }
        ));
    }
}
