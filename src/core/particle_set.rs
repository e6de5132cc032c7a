use crate::core::Particle;
use crate::core::kernel::ParticleTransferCache;
use crate::error::{SimError, SimResult};

/// Fixed-capacity particle storage plus the per-frame transfer cache.
///
/// All `capacity` slots exist from construction; only the first `len` are
/// simulated. Hosts write initial state straight into the slots.
#[derive(Clone)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    active: usize,
    transfer_cache: Vec<ParticleTransferCache>,
    // Particles whose stencils are in `transfer_cache`.
    prepared: usize,
}

impl ParticleSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::zeroed(); capacity],
            active: 0,
            transfer_cache: Vec::with_capacity(capacity),
            prepared: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    pub fn set_len(&mut self, count: usize) -> SimResult {
        if count > self.capacity() {
            return Err(SimError::ParticleCapacityExceeded {
                requested: count,
                capacity: self.capacity(),
            });
        }
        self.active = count;
        Ok(())
    }

    /// Append a particle after the active ones and return its index.
    pub fn push(&mut self, particle: Particle) -> SimResult<usize> {
        let index = self.active;
        self.set_len(index + 1)?;
        self.particles[index] = particle;
        Ok(index)
    }

    pub fn clear(&mut self) {
        self.active = 0;
        self.prepared = 0;
        self.transfer_cache.clear();
    }

    /// Active particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles[..self.active]
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.active]
    }

    /// Every slot, active or not.
    pub fn storage(&self) -> &[Particle] {
        &self.particles
    }

    pub fn storage_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles().iter()
    }

    pub fn transfer_cache(&self) -> &[ParticleTransferCache] {
        &self.transfer_cache
    }

    pub fn prepared_len(&self) -> usize {
        self.prepared
    }

    /// Active particles together with the cache, rebuilt for `count` particles
    /// padded to `padded_len` entries.
    pub fn particles_mut_and_fresh_cache(
        &mut self,
        padded_len: usize,
    ) -> (&mut [Particle], &mut [ParticleTransferCache]) {
        debug_assert!(padded_len >= self.active);
        self.transfer_cache.clear();
        self.transfer_cache
            .resize(padded_len, ParticleTransferCache::INERT);
        self.prepared = self.active;
        (
            &mut self.particles[..self.active],
            &mut self.transfer_cache,
        )
    }

    /// Particles that were prepared by the last P2G pass together with their cache.
    pub fn particles_mut_and_cache(&mut self) -> (&mut [Particle], &[ParticleTransferCache]) {
        (
            &mut self.particles[..self.prepared],
            &self.transfer_cache,
        )
    }
}
