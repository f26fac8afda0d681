pub mod acquirer;
pub mod codec_session;
