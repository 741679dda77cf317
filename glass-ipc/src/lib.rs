pub mod bounds;
pub mod command;
pub mod event;
pub mod settings;

pub use bounds::{Bounds, ParseSizeError, Size};
pub use command::{Command, Response, StateInfo};
pub use event::{HostFilter, HostRequest, SubscribeRequest, WindowSetup};
pub use settings::{
    ButtonConfig, ButtonKey, Location, ResolvedButton, ResolvedConfiguration, ResolvedLocation,
    Settings,
};
