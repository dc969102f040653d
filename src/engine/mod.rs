// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせてバッチ処理を提供

pub mod api;
pub mod barrier;
pub mod batch_processor;
pub mod worker_pool;

// 公開API - 主要エンジンクラス
pub use api::{create_default_batch_processor, create_quiet_batch_processor, process_store};
pub use barrier::{CompletionBarrier, CompletionGuard};
pub use batch_processor::BatchProcessor;
pub use worker_pool::{current_worker_id, JobHandle, WorkerPool};
