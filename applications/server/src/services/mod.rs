/// Server services
pub mod video_id;
pub mod ytdlp;

pub use ytdlp::YtDlpResolver;
