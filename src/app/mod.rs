// Front-ends that drive a SessionController.

pub mod terminal;
