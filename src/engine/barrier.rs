// Barrier - 完了待ち機能

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct BarrierState {
    outstanding: AtomicUsize,
    notify: Notify,
}

/// 登録済みのユニット・オブ・ワークが全て終わるまで待つバリア
///
/// `register` で得た `CompletionGuard` が全て完了（またはドロップ）した時点で
/// `wait` が戻る。登録が0件なら即座に戻る。
#[derive(Debug, Clone, Default)]
pub struct CompletionBarrier {
    state: Arc<BarrierState>,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユニット・オブ・ワークを1件登録
    pub fn register(&self) -> CompletionGuard {
        self.state.outstanding.fetch_add(1, Ordering::AcqRel);
        CompletionGuard {
            state: Some(Arc::clone(&self.state)),
        }
    }

    /// 未完了の件数
    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::Acquire)
    }

    /// 全件の完了を待機
    pub async fn wait(&self) {
        loop {
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            // 判定前に通知を受け取れる状態にしておく
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// 1件分の完了シグナル
///
/// `complete` 呼び出しかドロップのどちらか一度だけカウントを減らす。
/// パニックや未実行のままジョブが破棄された場合もバリアは解放される。
#[derive(Debug)]
#[must_use = "ガードを即座にドロップすると完了扱いになります"]
pub struct CompletionGuard {
    state: Option<Arc<BarrierState>>,
}

impl CompletionGuard {
    pub fn complete(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(state) = self.state.take() {
            if state.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
                state.notify.notify_waiters();
            }
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
