// アイテムとバッチ処理に関連するデータ型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ストアが採番するアイテム識別子
pub type ItemId = u64;

/// バッチ処理が書き込むステータス値
pub const PROCESSED_STATUS: &str = "PROCESSED";

/// 永続化されるアイテム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// 初回保存時にストアが割り当てる。未保存のドラフトのみ `None`
    pub id: Option<ItemId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl Item {
    /// 未保存のアイテムを作成
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            email: None,
            status: status.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_processed(&self) -> bool {
        self.status == PROCESSED_STATUS
    }
}

/// 作成・更新リクエストの入力
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// 指定IDのアイテムへ変換（`None` なら新規作成）
    pub fn into_item(self, id: Option<ItemId>) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            email: self.email,
            status: self.status,
        }
    }
}

/// 単一ユニット・オブ・ワークの結果
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// ステータス更新と保存に成功（ストアが返した正規形）
    Processed(Item),
    /// 列挙後に削除されていた
    Vanished { id: ItemId },
    /// 取得または保存に失敗
    Failed { id: ItemId, error: String },
    /// デッドライン超過のため開始されなかった
    Abandoned { id: ItemId },
}

impl ItemOutcome {
    pub fn id(&self) -> Option<ItemId> {
        match self {
            Self::Processed(item) => item.id,
            Self::Vanished { id } | Self::Failed { id, .. } | Self::Abandoned { id } => Some(*id),
        }
    }
}

/// 失敗したアイテムの記録
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    pub id: ItemId,
    pub error: String,
}

/// バッチ処理全体のレポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// 処理に成功したアイテム（順序不定）
    pub items: Vec<Item>,
    pub attempted: usize,
    pub vanished: Vec<ItemId>,
    pub failed: Vec<ItemFailure>,
    pub abandoned: Vec<ItemId>,
    /// デッドライン超過で未着手のIDが残った場合に true
    pub partial: bool,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    /// 空ストアに対するレポート
    pub fn empty(started_at: DateTime<Utc>) -> Self {
        Self {
            items: Vec::new(),
            attempted: 0,
            vanished: Vec::new(),
            failed: Vec::new(),
            abandoned: Vec::new(),
            partial: false,
            started_at,
            elapsed_ms: 0,
        }
    }

    pub fn processed_count(&self) -> usize {
        self.items.len()
    }

    /// 結果に含まれなかったIDの数
    pub fn skipped_count(&self) -> usize {
        self.vanished.len() + self.failed.len() + self.abandoned.len()
    }
}
