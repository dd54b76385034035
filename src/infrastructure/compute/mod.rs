mod event_stream;
mod gradio_provider;
mod json_provider;
mod provider_factory;
mod scripted_provider;

pub use event_stream::{EventStreamStatus, parse_event_stream};
pub use gradio_provider::GradioComputeProvider;
pub use json_provider::JsonComputeProvider;
pub use provider_factory::ComputeProviderFactory;
pub use scripted_provider::ScriptedComputeProvider;
