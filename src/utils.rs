/// Swap every occurrence of one marker value for another one.
pub fn replace<T>(values: &mut [T], from: T, to: T)
where
    T: PartialEq + Copy,
{
    if from == to {
        return;
    }

    for value in values {
        if *value == from {
            *value = to;
        }
    }
}

pub mod time {
    use std::time::Instant;

    /// `None` when timing is disabled, so nothing gets measured or reported.
    pub fn now() -> Option<Instant> {
        if cfg!(feature = "std_time") {
            Some(Instant::now())
        } else {
            None
        }
    }
}

pub mod rc {
    #[cfg(feature = "threaded")]
    use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
    #[cfg(not(feature = "threaded"))]
    use std::{
        cell::{Ref, RefCell, RefMut},
        rc::Rc,
    };

    #[cfg(not(feature = "threaded"))]
    pub type ReadRc<T> = Rc<T>;
    #[cfg(not(feature = "threaded"))]
    pub type ReadRef<'a, T> = Ref<'a, T>;
    #[cfg(not(feature = "threaded"))]
    pub type MutRef<'a, T> = RefMut<'a, T>;
    #[cfg(not(feature = "threaded"))]
    type Lock<T> = RefCell<T>;

    #[cfg(feature = "threaded")]
    pub type ReadRc<T> = Arc<T>;
    #[cfg(feature = "threaded")]
    pub type ReadRef<'a, T> = RwLockReadGuard<'a, T>;
    #[cfg(feature = "threaded")]
    pub type MutRef<'a, T> = RwLockWriteGuard<'a, T>;
    #[cfg(feature = "threaded")]
    type Lock<T> = RwLock<T>;

    /// Shared handle with interior mutability:
    /// `Rc<RefCell<T>>` by default, `Arc<RwLock<T>>` with the `threaded` feature.
    #[derive(Debug)]
    pub struct MutRc<T>(ReadRc<Lock<T>>);

    impl<T> MutRc<T> {
        pub fn new(value: T) -> Self {
            Self(ReadRc::new(Lock::new(value)))
        }
    }

    impl<T> Clone for MutRc<T> {
        fn clone(&self) -> Self {
            Self(ReadRc::clone(&self.0))
        }
    }

    #[cfg(not(feature = "threaded"))]
    impl<T> MutRc<T> {
        pub fn read(&self) -> ReadRef<'_, T> {
            self.0.borrow()
        }

        pub fn write(&self) -> MutRef<'_, T> {
            self.0.borrow_mut()
        }
    }

    #[cfg(feature = "threaded")]
    impl<T> MutRc<T> {
        pub fn read(&self) -> ReadRef<'_, T> {
            self.0.read().expect("lock poisoned by a panicked writer")
        }

        pub fn write(&self) -> MutRef<'_, T> {
            self.0.write().expect("lock poisoned by a panicked writer")
        }
    }
}
