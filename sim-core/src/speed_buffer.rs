use glam::Vec2;

/// A rolling buffer of recent squared drag-velocity components.
///
/// While a balloon is dragged, every frame pushes the instantaneous
/// velocity into this buffer. The buffer keeps, per axis:
///
/// - The squared velocity component of each of the last `len` frames.
/// - A write index that wraps around modulo `len`.
///
/// This smooths out single-frame jitter of the pointer so that a balloon
/// resting under a motionless pointer is not mistaken for one being rubbed
/// on the sweater.
///
/// Internally, `x[i]` and `y[i]` belong to the same frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedBuffer {
    /// Squared x velocity per slot.
    x: Vec<f32>,
    /// Squared y velocity per slot.
    y: Vec<f32>,
    /// Next slot to overwrite.
    next: usize,
}

impl SpeedBuffer {
    /// Creates a new [`SpeedBuffer`] with `len` zeroed slots.
    ///
    /// ### Parameters
    /// - `len` - Number of frames averaged over. Must be at least one.
    ///
    /// ### Returns
    /// A new [`SpeedBuffer`] whose [`SpeedBuffer::smoothed_speed`] is `0`.
    pub fn with_len(len: usize) -> Self {
        debug_assert!(len > 0, "speed buffer needs at least one slot");
        let len = len.max(1);
        Self {
            x: vec![0.0; len],
            y: vec![0.0; len],
            next: 0,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Zeroes every slot and rewinds the write index.
    pub fn clear(&mut self) {
        self.x.fill(0.0);
        self.y.fill(0.0);
        self.next = 0;
    }

    /// Records one frame's velocity, overwriting the oldest sample.
    ///
    /// ### Parameters
    /// - `velocity` - Instantaneous drag velocity of the frame.
    #[inline]
    pub fn push(&mut self, velocity: Vec2) {
        debug_assert_eq!(self.x.len(), self.y.len());
        self.x[self.next] = velocity.x * velocity.x;
        self.y[self.next] = velocity.y * velocity.y;
        self.next = (self.next + 1) % self.x.len();
    }

    /// Per-axis mean of the squared velocity samples.
    ///
    /// ### Returns
    /// `(mean(vx^2), mean(vy^2))` as a vector.
    pub fn average(&self) -> Vec2 {
        let n = self.x.len() as f32;
        Vec2::new(self.x.iter().sum::<f32>() / n, self.y.iter().sum::<f32>() / n)
    }

    /// Smoothed drag speed estimate.
    ///
    /// This is the length of [`SpeedBuffer::average`]. Only its sign matters
    /// to the charge pickup gate: it is zero exactly when every sample in the
    /// window was a standstill.
    ///
    /// ### Returns
    /// A non-negative speed metric.
    pub fn smoothed_speed(&self) -> f32 {
        self.average().length()
    }
}
