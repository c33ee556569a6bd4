//! connection.rs
//!
//! Менеджер соединения с БД: одно живое подключение на процесс и не более
//! одной попытки подключения одновременно.
//!
//! Состояния: `Unconnected -> Connecting -> Connected`. Неудачная попытка
//! возвращает менеджер в `Unconnected`, и следующий вызов начинает новую.
//! Все, кто ждал неудачную попытку, получают одну и ту же ошибку.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Способ открыть подключение и проверить, что оно живо.
///
/// Ошибки - строки, потому что результат одной попытки раздается
/// всем ожидающим и должен быть `Clone`.
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    fn connect(&self) -> BoxFuture<'static, Result<Self::Handle, String>>;

    fn ping(&self, handle: &Self::Handle) -> BoxFuture<'static, Result<(), String>>;
}

/// Публичное представление состояния менеджера.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connecting,
    Connected,
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, String>>>;

enum Slot<H> {
    Unconnected,
    Connecting { attempt: u64, future: Attempt<H> },
    Connected(H),
}

pub struct ConnectionManager<C: Connector> {
    connector: C,
    slot: Mutex<Slot<C::Handle>>,
    attempts: AtomicU64,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            slot: Mutex::new(Slot::Unconnected),
            attempts: AtomicU64::new(0),
        }
    }

    /// Вернуть живое подключение, при необходимости открыв его.
    ///
    /// Если попытка уже идет, вызывающий ждет ее же, а не открывает свою.
    pub async fn get(&self) -> AppResult<C::Handle> {
        let (attempt, future) = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Connected(handle) => return Ok(handle.clone()),
                Slot::Connecting { attempt, future } => (*attempt, future.clone()),
                Slot::Unconnected => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    info!(attempt, "Opening database connection");
                    let future = self.connector.connect().shared();
                    *slot = Slot::Connecting {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let result = future.await;

        // Результат применяем только к той попытке, которую ждали
        let mut slot = self.lock();
        let is_current =
            matches!(&*slot, Slot::Connecting { attempt: current, .. } if *current == attempt);

        match result {
            Ok(handle) => {
                if is_current {
                    info!(attempt, "Database connected");
                    *slot = Slot::Connected(handle.clone());
                }
                Ok(handle)
            }
            Err(e) => {
                if is_current {
                    warn!(attempt, error = %e, "Database connection attempt failed");
                    *slot = Slot::Unconnected;
                }
                Err(AppError::Dependency(format!(
                    "database connection failed: {e}"
                )))
            }
        }
    }

    /// Сбросить подключение: следующий `get` откроет новое.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        if matches!(&*slot, Slot::Connected(_)) {
            warn!("Database connection invalidated");
            *slot = Slot::Unconnected;
        }
    }

    /// Проверить подключение запросом; при отказе сбросить его.
    pub async fn check_health(&self) -> AppResult<()> {
        let handle = self.get().await?;
        match self.connector.ping(&handle).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.invalidate();
                Err(AppError::Dependency(format!("database health check failed: {e}")))
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.lock() {
            Slot::Unconnected => ConnectionState::Unconnected,
            Slot::Connecting { .. } => ConnectionState::Connecting,
            Slot::Connected(_) => ConnectionState::Connected,
        }
    }

    /// Сколько попыток подключения было начато за время жизни менеджера.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Slot<C::Handle>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
