//! Dispatcher scenario tests


mod channel_control;
mod headless_playback;
