use seam_core::SeamError;

/// Setup state of a [`crate::Seam`].
///
/// `Uninitialized -> DependencySet -> Initialized`. Every transition that does
/// not apply to the current state fails without changing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// No live source has been set yet.
    #[default]
    Uninitialized,
    /// A live source is set; it may still be replaced.
    DependencySet,
    /// Both sources are initialized and wired; retrieval is allowed.
    Initialized,
}

impl Lifecycle {
    /// Record that the live source was (re)set.
    ///
    /// # Errors
    /// `LiveSourceLocked` once initialized.
    pub fn set_dependency(&mut self) -> Result<(), SeamError> {
        match self {
            Self::Initialized => Err(SeamError::LiveSourceLocked),
            Self::Uninitialized | Self::DependencySet => {
                *self = Self::DependencySet;
                Ok(())
            }
        }
    }

    /// Check that initialization may start. Does not change the state.
    ///
    /// # Errors
    /// `MissingLiveSource` before a live source is set, `AlreadyInitialized`
    /// after a successful initialization.
    pub const fn check_can_initialize(self) -> Result<(), SeamError> {
        match self {
            Self::Uninitialized => Err(SeamError::MissingLiveSource),
            Self::DependencySet => Ok(()),
            Self::Initialized => Err(SeamError::AlreadyInitialized),
        }
    }

    /// Mark initialization as done.
    ///
    /// # Errors
    /// Same as [`Lifecycle::check_can_initialize`].
    pub fn complete_initialize(&mut self) -> Result<(), SeamError> {
        self.check_can_initialize()?;
        *self = Self::Initialized;
        Ok(())
    }

    /// Check that retrieval is allowed.
    ///
    /// # Errors
    /// `NotInitialized` unless initialization completed.
    pub const fn ensure_ready(self) -> Result<(), SeamError> {
        match self {
            Self::Initialized => Ok(()),
            Self::Uninitialized | Self::DependencySet => Err(SeamError::NotInitialized),
        }
    }

    /// Whether retrieval is allowed.
    #[must_use]
    pub const fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized)
    }
}
