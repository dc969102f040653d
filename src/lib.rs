// item_batch - ストア全件の並列ステータス更新
//
// core: トレイト・型・エラー / store: ストア実装 / services: 設定・監視・処理・収集
// engine: ワーカープールとバッチプロセッサ / app: CRUDファサード / cli: コマンドライン

pub mod app;
pub mod cli;
pub mod core;
pub mod engine;
pub mod services;
pub mod store;

// 公開API
pub use app::ItemService;
pub use core::{
    BatchConfig, BatchReport, Item, ItemDraft, ItemFailure, ItemId, ItemOutcome, ItemStore,
    ProcessingError, ProcessingResult, ProgressReporter, StoreError, StoreResult, PROCESSED_STATUS,
};
pub use engine::{BatchProcessor, CompletionBarrier, CompletionGuard, JobHandle, WorkerPool};
pub use services::{
    DefaultBatchConfig, LoggingProgressReporter, NoOpProgressReporter, ResultCollector,
};
pub use store::{JsonFileItemStore, MemoryItemStore};
