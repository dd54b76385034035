mod event_stream_test;
mod json_provider_test;
mod provider_factory_test;
mod scripted_provider_test;
