// 結果収集機能
// 成功アイテムの蓄積と、ユニット・オブ・ワークの結果集計

pub mod collector;

// 公開API
pub use collector::{spawn_result_collector, CollectedOutcomes, ResultCollector};
