// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// 公開API - 明示的にエクスポートして曖昧性を回避
pub use error::{ProcessingError, ProcessingResult, StoreError, StoreResult};
pub use traits::{BatchConfig, ItemStore, ProgressReporter};
pub use types::{BatchReport, Item, ItemDraft, ItemFailure, ItemId, ItemOutcome, PROCESSED_STATUS};
