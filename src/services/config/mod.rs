// 設定管理機能
// ワーカー数、チャンネルバッファ、デッドラインの設定

pub mod implementations;

// 公開API
pub use implementations::{
    validate_config, DefaultBatchConfig, DEFAULT_CHANNEL_BUFFER_SIZE, DEFAULT_MAX_CONCURRENT_TASKS,
};
