// WorkerPool - 固定サイズの並列ワーカープール

use crate::core::{ProcessingError, ProcessingResult};
use crate::services::monitoring::panic_message;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type SharedJobReceiver = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Job>>>;

tokio::task_local! {
    static WORKER_ID: usize;
}

/// 実行中ジョブのワーカー番号（プール外では None）
pub fn current_worker_id() -> Option<usize> {
    WORKER_ID.try_with(|id| *id).ok()
}

/// 投入済みジョブの結果ハンドル
#[derive(Debug)]
pub struct JobHandle<T> {
    result_rx: oneshot::Receiver<T>,
}

impl<T> JobHandle<T> {
    /// ジョブの完了を待って出力を取得
    ///
    /// ジョブがパニックした場合や実行前に破棄された場合は `JobAborted`。
    pub async fn join(self) -> ProcessingResult<T> {
        self.result_rx
            .await
            .map_err(|_| ProcessingError::job_aborted("ジョブが結果を返さずに終了しました"))
    }
}

/// 固定数のワーカーでジョブを実行するプール
///
/// ジョブは FIFO キューに入り、空いたワーカーが投入順に取り出す。
/// 同時に実行されるジョブは常に `size` 以下。
pub struct WorkerPool {
    job_tx: mpsc::UnboundedSender<Job>,
    workers: Vec<tokio::task::JoinHandle<()>>,
    active: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// `size` 個のワーカーを起動
    pub fn new(size: usize) -> ProcessingResult<Self> {
        if size == 0 {
            return Err(ProcessingError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }

        let (job_tx, job_rx) = mpsc::unbounded_channel::<Job>();
        let job_rx = Arc::new(tokio::sync::Mutex::new(job_rx));
        let active = Arc::new(AtomicUsize::new(0));

        let workers = (0..size)
            .map(|worker_id| spawn_worker(worker_id, Arc::clone(&job_rx), Arc::clone(&active)))
            .collect();

        tracing::debug!(workers = size, "worker pool started");

        Ok(Self {
            job_tx,
            workers,
            active,
        })
    }

    /// ジョブを投入（ブロックしない）
    pub fn submit<F, T>(&self, job: F) -> ProcessingResult<JobHandle<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        let wrapped: Job = Box::pin(async move {
            let output = job.await;
            // ハンドルが破棄されていても無視
            let _ = result_tx.send(output);
        });

        self.job_tx
            .send(wrapped)
            .map_err(|_| ProcessingError::PoolClosed)?;

        Ok(JobHandle { result_rx })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// 現在実行中のジョブ数
    pub fn active_jobs(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// キューに残ったジョブを処理し終えてから全ワーカーを停止
    pub async fn shutdown(self) -> ProcessingResult<()> {
        let Self {
            job_tx, workers, ..
        } = self;

        // 送信側を閉じてワーカーに終了を通知
        drop(job_tx);

        for handle in workers {
            handle.await.map_err(ProcessingError::task)?;
        }

        tracing::debug!("worker pool stopped");
        Ok(())
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size())
            .field("active_jobs", &self.active_jobs())
            .finish()
    }
}

/// 単一ワーカー
fn spawn_worker(
    worker_id: usize,
    job_rx: SharedJobReceiver,
    active: Arc<AtomicUsize>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            // 次のジョブを取得
            let job = {
                let mut rx = job_rx.lock().await;
                match rx.recv().await {
                    Some(job) => job,
                    None => break, // チャンネル終了
                }
            };

            active.fetch_add(1, Ordering::AcqRel);
            let result = AssertUnwindSafe(WORKER_ID.scope(worker_id, job))
                .catch_unwind()
                .await;
            active.fetch_sub(1, Ordering::AcqRel);

            if let Err(payload) = result {
                let panic = panic_message(payload.as_ref());
                tracing::error!(worker_id, %panic, "job panicked");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_worker_pool_creation() {
        let pool = WorkerPool::new(4).unwrap();

        assert_eq!(pool.size(), 4);
        assert_eq!(pool.active_jobs(), 0);
        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_workers_is_rejected() {
        let result = WorkerPool::new(0);
        assert!(matches!(
            result,
            Err(ProcessingError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_join_returns_job_output() {
        let pool = WorkerPool::new(2).unwrap();

        let handle = pool.submit(async { 21 * 2 }).unwrap();
        assert_eq!(handle.join().await.unwrap(), 42);
        pool.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_pool_size() {
        let pool = WorkerPool::new(3).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let high_water = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let running = Arc::clone(&running);
                let high_water = Arc::clone(&high_water);
                pool.submit(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    high_water.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();

        for handle in handles {
            handle.join().await.unwrap();
        }

        assert!(high_water.load(Ordering::SeqCst) <= 3);
        assert!(high_water.load(Ordering::SeqCst) >= 1);
        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_single_worker_runs_jobs_in_submission_order() {
        let pool = WorkerPool::new(1).unwrap();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..10 {
            let order = Arc::clone(&order);
            pool.submit(async move {
                tokio::task::yield_now().await;
                order.lock().push(i);
            })
            .unwrap();
        }
        pool.shutdown().await.unwrap();

        assert_eq!(*order.lock(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_panicking_job_is_contained() {
        let pool = WorkerPool::new(1).unwrap();

        let crashed = pool
            .submit(async {
                panic!("job exploded");
            })
            .unwrap();
        let result: ProcessingResult<()> = crashed.join().await;
        assert!(matches!(result, Err(ProcessingError::JobAborted { .. })));

        // 同じワーカーが次のジョブを処理できる
        let survivor = pool.submit(async { "still alive" }).unwrap();
        assert_eq!(survivor.join().await.unwrap(), "still alive");
        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_drains_queued_jobs() {
        let pool = WorkerPool::new(2).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let done = Arc::clone(&done);
            pool.submit(async move {
                done.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.shutdown().await.unwrap();

        assert_eq!(done.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn test_current_worker_id() {
        assert_eq!(current_worker_id(), None);

        let pool = WorkerPool::new(2).unwrap();
        let id = pool.submit(async { current_worker_id() }).unwrap();
        let id = id.join().await.unwrap();

        assert!(matches!(id, Some(0) | Some(1)));
        pool.shutdown().await.unwrap();
    }
}
