//! 忙碌状态指示
//!
//! 批处理开始时置为忙碌，结束时（包括出错）由 `BusyGuard` 释放

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::info;

/// 忙碌状态的接收方
pub trait BusyIndicator {
    fn set_busy(&self, busy: bool);
}

/// 持有期间保持忙碌，离开作用域时释放
pub struct BusyGuard<'a, B: BusyIndicator + ?Sized> {
    indicator: &'a B,
}

impl<'a, B: BusyIndicator + ?Sized> BusyGuard<'a, B> {
    pub fn acquire(indicator: &'a B) -> Self {
        indicator.set_busy(true);
        Self { indicator }
    }
}

impl<B: BusyIndicator + ?Sized> Drop for BusyGuard<'_, B> {
    fn drop(&mut self) {
        self.indicator.set_busy(false);
    }
}

/// 通过日志报告状态
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBusyIndicator;

impl BusyIndicator for LogBusyIndicator {
    fn set_busy(&self, busy: bool) {
        if busy {
            info!("⏳ 正在处理...");
        } else {
            info!("✓ 处理结束");
        }
    }
}

/// 记录状态变化的指示器
#[derive(Debug, Default)]
pub struct FlagBusyIndicator {
    busy: AtomicBool,
    history: Mutex<Vec<bool>>,
}

impl FlagBusyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// 按顺序返回每次 `set_busy` 的值
    pub fn history(&self) -> Vec<bool> {
        match self.history.lock() {
            Ok(history) => history.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl BusyIndicator for FlagBusyIndicator {
    fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
        match self.history.lock() {
            Ok(mut history) => history.push(busy),
            Err(poisoned) => poisoned.into_inner().push(busy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let indicator = FlagBusyIndicator::new();
        {
            let _guard = BusyGuard::acquire(&indicator);
            assert!(indicator.is_busy());
        }
        assert!(!indicator.is_busy());
        assert_eq!(indicator.history(), vec![true, false]);
    }

    #[test]
    fn test_guard_releases_on_early_return() {
        fn failing(indicator: &FlagBusyIndicator) -> Result<(), String> {
            let _guard = BusyGuard::acquire(indicator);
            if indicator.is_busy() {
                return Err("boom".to_string());
            }
            Ok(())
        }

        let indicator = FlagBusyIndicator::new();
        assert!(failing(&indicator).is_err());
        assert!(!indicator.is_busy());
        assert_eq!(indicator.history(), vec![true, false]);
    }
}
