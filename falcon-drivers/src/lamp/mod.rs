//! Lamp outputs
//!
//! A lamp turns a compensated channel value into a duty cycle. Lamps on
//! relays or plain GPIO use [`SwitchedLamp`] as their duty output.

mod pwm;
mod switched;

pub use pwm::Lamp;
pub use switched::SwitchedLamp;
