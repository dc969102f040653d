// アイテム処理機能
// 単一アイテムの取得、ステータス更新、保存

pub mod worker;

// 公開API
pub use worker::process_single_item;
