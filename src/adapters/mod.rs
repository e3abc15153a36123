//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                          | Connects to          |
//! |------------|-------------------------------------|----------------------|
//! | `log_sink` | EventSink                           | `log` facade         |
//! | `sim`      | MotorPort, EncoderPort, AnalogPort  | In-memory robot model|

pub mod log_sink;
pub mod sim;
