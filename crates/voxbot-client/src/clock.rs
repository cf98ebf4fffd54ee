//! 时钟抽象
//!
//! 控制循环只通过 [`Clock`] 睡眠，测试中换成 [`ManualClock`] 即可在不真实等待的
//! 情况下推进时间，并在每次睡眠时模拟位姿观测。

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 时钟
pub trait Clock: Send + Sync {
    /// 自时钟创建以来经过的时间
    fn elapsed(&self) -> Duration;

    /// 睡眠指定时长
    fn sleep(&self, duration: Duration);
}

/// 系统时钟（`spin_sleep` 高精度睡眠）
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        spin_sleep::sleep(duration);
    }
}

type TickHook = Arc<dyn Fn(Duration) + Send + Sync>;

/// 手动时钟
///
/// `sleep()` 立即返回，只推进虚拟时间，然后以新的虚拟时间调用 tick 钩子。
/// 钩子在锁外执行，可以安全地读取时钟本身。
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
    hook: Mutex<Option<TickHook>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置每次睡眠后执行的钩子
    pub fn on_tick(&self, hook: impl Fn(Duration) + Send + Sync + 'static) {
        *self.hook.lock() = Some(Arc::new(hook));
    }

    /// 清除钩子
    pub fn clear_hook(&self) {
        *self.hook.lock() = None;
    }

    /// 手动推进虚拟时间（不触发钩子）
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }

    /// 已发生的睡眠调用（按顺序）
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// 睡眠总时长
    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        let now = {
            let mut now = self.now.lock();
            *now += duration;
            *now
        };
        self.sleeps.lock().push(duration);

        let hook = self.hook.lock().clone();
        if let Some(hook) = hook {
            hook(now);
        }
    }
}
