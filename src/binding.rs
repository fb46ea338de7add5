//! Bus binding for the blink controller.
//!
//! [`BusBinding`] connects a [`BlinkController`] to the two group objects of
//! the device and performs one cooperative scheduler iteration per
//! [`BusBinding::poll`] call.

use crate::controller::BlinkController;
use crate::indicator::IndicatorDriver;
use crate::params::{ConfigService, ParameterError, ParameterSet};
use crate::time::{TimeInstant, TimeSource};
use heapless::Deque;

/// Maximum number of state values buffered during one processing step.
pub const PUBLISH_QUEUE_CAPACITY: usize = 8;

/// Number of a group object as assigned by the project.
///
/// Group objects are numbered contiguously starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectId(pub u16);

impl From<u16> for ObjectId {
    fn from(id: u16) -> Self {
        ObjectId(id)
    }
}

impl From<ObjectId> for u16 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// Inbound activation command.
pub const ACTIVATE_OBJECT: ObjectId = ObjectId(1);

/// Outbound LED state.
pub const STATE_OBJECT: ObjectId = ObjectId(2);

/// All group objects of the device, in numbering order.
pub const GROUP_OBJECTS: [ObjectId; 2] = [ACTIVATE_OBJECT, STATE_OBJECT];

/// Datapoint type assigned to a group object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DatapointType {
    /// DPT 1.001, single-bit on/off.
    Switch,
}

impl DatapointType {
    /// Returns the `(main, sub)` DPT number.
    pub fn number(self) -> (u16, u16) {
        match self {
            DatapointType::Switch => (1, 1),
        }
    }
}

/// Receiver of events raised by the bus stack during a processing step.
pub trait GroupObjectHandler {
    /// A telegram wrote `value` to `object`.
    fn on_write(&mut self, object: ObjectId, value: bool);

    /// Programming mode was entered or left.
    fn on_programming_mode(&mut self, _active: bool) {}
}

/// Black-box bus stack consumed by the binding.
pub trait BusStack: ConfigService {
    /// Assigns the datapoint type used to encode and validate `object`.
    fn set_datapoint_type(&mut self, object: ObjectId, dpt: DatapointType);

    /// Writes `value` to `object`, sending it on the bus.
    fn write(&mut self, object: ObjectId, value: bool);

    /// Runs one step of the stack's own processing.
    ///
    /// Inbound writes and programming-mode changes are reported to `handler`
    /// synchronously before this returns.
    fn process_step(&mut self, handler: &mut dyn GroupObjectHandler);
}

/// Indicator channel: a running controller, or the bare indicator when the
/// device is not configured.
enum Channel<I: TimeInstant, D: IndicatorDriver> {
    Enabled(BlinkController<I, D>),
    Disabled(D),
}

/// Routes bus events to the channel during a processing step and collects
/// the state values to publish once the stack is free again.
struct Dispatcher<'a, I: TimeInstant, D: IndicatorDriver> {
    channel: &'a mut Channel<I, D>,
    now: I,
    outbox: &'a mut Deque<bool, PUBLISH_QUEUE_CAPACITY>,
}

impl<I: TimeInstant, D: IndicatorDriver> GroupObjectHandler for Dispatcher<'_, I, D> {
    fn on_write(&mut self, object: ObjectId, value: bool) {
        if object != ACTIVATE_OBJECT {
            return;
        }
        let Channel::Enabled(controller) = &mut *self.channel else {
            return;
        };

        info!("activation command: {=bool}", value);
        if let Some(state) = controller.on_activation_changed(value, self.now) {
            enqueue(self.outbox, state);
        }
    }

    // Works on unconfigured devices too, programming mode is how they get
    // configured.
    fn on_programming_mode(&mut self, active: bool) {
        info!("programming mode: {=bool}", active);
        match &mut *self.channel {
            Channel::Enabled(controller) => controller.set_programming_indicator(active),
            Channel::Disabled(indicator) => indicator.set_programming_indicator(active),
        }
    }
}

/// Queues a state value.
///
/// Queued values alternate, so when the queue is full the newest entry and
/// `state` cancel out: dropping both keeps the alternation and leaves the
/// last queued value equal to `state`.
fn enqueue(outbox: &mut Deque<bool, PUBLISH_QUEUE_CAPACITY>, state: bool) {
    if outbox.push_back(state).is_err() {
        warn!("publish queue full, coalescing state updates");
        outbox.pop_back();
    }
}

/// Connects a [`BlinkController`] to the bus stack.
///
/// On an unconfigured device no controller is built and the binding only
/// keeps the bus stack and the programming-mode indicator running.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - Bus stack implementation type
/// * `D` - Indicator implementation type
/// * `T` - Time source implementation type
pub struct BusBinding<'t, I: TimeInstant, S: BusStack, D: IndicatorDriver, T: TimeSource<I>> {
    stack: S,
    time_source: &'t T,
    channel: Channel<I, D>,
    outbox: Deque<bool, PUBLISH_QUEUE_CAPACITY>,
}

impl<'t, I: TimeInstant, S: BusStack, D: IndicatorDriver, T: TimeSource<I>>
    BusBinding<'t, I, S, D, T>
{
    /// Sets up the binding from the stack's configuration.
    ///
    /// If the device is configured, loads the parameters, assigns DPT 1.001
    /// to both group objects and builds the controller.
    pub fn new(mut stack: S, indicator: D, time_source: &'t T) -> Self {
        let channel = match ParameterSet::load(&stack) {
            Ok(params) => {
                for object in GROUP_OBJECTS {
                    stack.set_datapoint_type(object, DatapointType::Switch);
                }
                info!("group objects linked, parameters: {}", params);
                Channel::Enabled(BlinkController::new(params, indicator))
            }
            Err(ParameterError::NotConfigured) => {
                warn!("device not configured, blink channel disabled");
                Channel::Disabled(indicator)
            }
        };

        Self {
            stack,
            time_source,
            channel,
            outbox: Deque::new(),
        }
    }

    /// Runs one scheduler iteration.
    ///
    /// Runs the stack's processing step, dispatching activation commands to
    /// the controller, then ticks the controller and writes every resulting
    /// LED state to the state object. Never blocks.
    pub fn poll(&mut self) {
        let now = self.time_source.now();
        let mut dispatcher = Dispatcher {
            channel: &mut self.channel,
            now,
            outbox: &mut self.outbox,
        };
        self.stack.process_step(&mut dispatcher);

        let Channel::Enabled(controller) = &mut self.channel else {
            return;
        };

        if let Some(state) = controller.tick(self.time_source.now()) {
            enqueue(&mut self.outbox, state);
        }

        while let Some(state) = self.outbox.pop_front() {
            self.stack.write(STATE_OBJECT, state);
        }
    }

    /// Returns true if the device is configured and the controller exists.
    pub fn is_enabled(&self) -> bool {
        matches!(self.channel, Channel::Enabled(_))
    }

    /// Returns the controller, if the binding is enabled.
    pub fn controller(&self) -> Option<&BlinkController<I, D>> {
        match &self.channel {
            Channel::Enabled(controller) => Some(controller),
            Channel::Disabled(_) => None,
        }
    }

    /// Returns the indicator, whether or not the binding is enabled.
    pub fn indicator(&self) -> &D {
        match &self.channel {
            Channel::Enabled(controller) => controller.indicator(),
            Channel::Disabled(indicator) => indicator,
        }
    }

    /// Returns a reference to the bus stack.
    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// Returns a mutable reference to the bus stack.
    pub fn stack_mut(&mut self) -> &mut S {
        &mut self.stack
    }
}
