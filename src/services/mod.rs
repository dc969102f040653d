// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod collection;
pub mod config;
pub mod monitoring;
pub mod processing;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use collection::{spawn_result_collector, CollectedOutcomes, ResultCollector};
pub use config::{validate_config, DefaultBatchConfig};
pub use monitoring::{contain_report, LoggingProgressReporter, NoOpProgressReporter};
pub use processing::process_single_item;
