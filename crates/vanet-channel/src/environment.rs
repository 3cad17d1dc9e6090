//! Radio environment classes.

/// The propagation environment along a road.
///
/// The class sets the Nakagami shape parameter `m`: a higher `m` means more
/// line-of-sight energy and less severe small-scale fading, so the ordering
/// runs urban < suburban < highway.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Environment {
    /// Dense buildings, heavy multipath.  m = 1 is Rayleigh fading.
    Urban,
    /// Mixed buildings and open space.
    Suburban,
    /// Open space, long sight lines.
    Highway,
}

impl Environment {
    /// Nakagami shape for vehicle-to-vehicle links.
    #[inline]
    pub fn v2v_shape(self) -> f64 {
        match self {
            Environment::Urban => 1.0,
            Environment::Suburban => 2.0,
            Environment::Highway => 3.0,
        }
    }

    /// Nakagami shape for vehicle-to-infrastructure links.
    ///
    /// Roadside units sit on elevated masts, so each class fades less
    /// severely than its vehicle-to-vehicle counterpart.
    #[inline]
    pub fn v2i_shape(self) -> f64 {
        match self {
            Environment::Urban => 1.5,
            Environment::Suburban => 2.5,
            Environment::Highway => 3.5,
        }
    }
}

impl Default for Environment {
    /// Off-road positions fall back to the worst-case urban profile.
    fn default() -> Self {
        Environment::Urban
    }
}
