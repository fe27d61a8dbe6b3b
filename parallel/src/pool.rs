use common::Result;
use futures::future::try_join_all;
use itertools::Itertools;
use std::{future::Future, sync::Arc};
use tokio::sync::{mpsc, Mutex};

/// A channel already holding every task, closed for further sends.
pub fn queue<T>(tasks: Vec<T>) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(tasks.len().max(1));
    for task in tasks {
        if tx.try_send(task).is_err() {
            unreachable!("queue is sized for every task");
        }
    }
    rx
}

/// Runs `f` over every task received on `tasks`, on `workers` concurrent
/// workers, until the senders are gone. Returns the first error once all
/// workers have stopped.
pub async fn run_pool<T, F, Fut>(workers: usize, tasks: mpsc::Receiver<T>, f: F) -> Result<()>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let tasks = Arc::new(Mutex::new(tasks));

    let handles = (0..workers)
        .map(|_| {
            let tasks = Arc::clone(&tasks);
            let f = f.clone();
            tokio::spawn(async move {
                loop {
                    let task = tasks.lock().await.recv().await;
                    let task = match task {
                        Some(task) => task,
                        None => return Ok::<_, eyre::Report>(()),
                    };
                    let run = f(task);
                    run.await?;
                }
            })
        })
        .collect_vec();

    for result in try_join_all(handles).await? {
        result?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{queue, run_pool};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn every_task_runs_once() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sum = Arc::new(AtomicUsize::new(0));
        let (s, t) = (Arc::clone(&seen), Arc::clone(&sum));
        run_pool(4, queue((1..=100).collect()), move |n: usize| {
            let (seen, sum) = (Arc::clone(&s), Arc::clone(&t));
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                sum.fetch_add(n, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 100);
        assert_eq!(sum.load(Ordering::SeqCst), 5050);
    }

    #[tokio::test]
    async fn tasks_stream_through_a_bounded_channel() {
        let (tx, rx) = mpsc::channel(2);
        let producer = tokio::spawn(async move {
            for n in 0..50usize {
                tx.send(n).await.unwrap();
            }
        });

        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        run_pool(3, rx, move |_n: usize| {
            let seen = Arc::clone(&s);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();
        producer.await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn errors_propagate() {
        let result = run_pool(2, queue(vec![1, 2, 3]), |n: i32| async move {
            if n == 2 {
                eyre::bail!("task {} failed", n);
            }
            Ok(())
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn no_tasks() {
        run_pool(3, queue(Vec::<u8>::new()), |_| async { Ok(()) })
            .await
            .unwrap();
    }
}
