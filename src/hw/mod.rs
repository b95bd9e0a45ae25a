pub mod led;
pub mod pins;
pub mod tick;
pub mod usart;

pub use led::Led;
pub use pins::BoardPins;
pub use tick::TickTimer;
pub use usart::Usart;
