use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// # Summary
/// 时间供给器接口，用于给新成交打时间戳。
/// 测试通过虚拟时钟获得可复现的成交时间。
pub trait TimeProvider: Send + Sync {
    /// 获取当前挂载的时间
    fn now(&self) -> DateTime<Utc>;
}

/// # Summary
/// 运行时使用的真实时钟，直接返回操作系统当前时间。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 虚拟时钟，允许测试主动设置或拨快时间。
///
/// # Invariants
/// - 并发安全：内部利用 `RwLock` 提供给多线程安全修改和读取时间的权限。
/// - 锁中毒时继续使用中毒前写入的值。
pub struct FakeClockProvider {
    current_time: RwLock<DateTime<Utc>>,
}

impl FakeClockProvider {
    /// 使用指定的初始时间创建虚拟时钟
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    /// 强制修改时钟的当前时间
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        let mut time = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *time = new_time;
    }

    /// 将时钟向前拨动指定时长
    pub fn advance(&self, step: Duration) {
        let mut time = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *time += step;
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self
            .current_time
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
