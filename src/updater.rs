pub const TARGET_FPS: u32 = 60;

/// Upper bound on catch-up steps per frame after a stall.
const MAX_STEPS_PER_FRAME: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered during the last full second.
    pub fps: u32,
    /// Simulation steps since start.
    pub ticks: u64,
}

/// Turns variable frame times into fixed simulation steps.
#[derive(Debug)]
pub struct Updater {
    step: f32,
    accumulator: f32,
    ticks: u64,
    frames: u32,
    fps: u32,
    fps_elapsed: f32,
}

impl Default for Updater {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}

impl Updater {
    pub fn new(target_fps: u32) -> Self {
        Updater {
            step: 1.0 / target_fps.max(1) as f32,
            accumulator: 0.0,
            ticks: 0,
            frames: 0,
            fps: 0,
            fps_elapsed: 0.0,
        }
    }

    /// Length of one simulation step in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accounts for one rendered frame of `frame_dt` seconds and returns how
    /// many fixed steps to simulate.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.frames += 1;
        self.fps_elapsed += frame_dt;
        if self.fps_elapsed >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            // keep the overshoot; a stall longer than a second is dropped
            self.fps_elapsed %= 1.0;
        }

        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        self.ticks += u64::from(steps);
        steps
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            fps: self.fps,
            ticks: self.ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_per_frame_at_target_rate() {
        let mut updater = Updater::new(50);
        for _ in 0..10 {
            assert_eq!(updater.advance(0.02), 1);
        }
        assert_eq!(updater.stats().ticks, 10);
    }

    #[test]
    fn fast_frames_accumulate() {
        let mut updater = Updater::new(50);
        assert_eq!(updater.advance(0.01), 0);
        assert_eq!(updater.advance(0.011), 1);
    }

    #[test]
    fn stall_is_capped() {
        let mut updater = Updater::new(60);
        assert_eq!(updater.advance(5.0), MAX_STEPS_PER_FRAME);
        assert_eq!(updater.advance(0.0), 0);
    }

    #[test]
    fn fps_reported_after_a_second() {
        let mut updater = Updater::new(60);
        for _ in 0..39 {
            updater.advance(0.025);
        }
        assert_eq!(updater.stats().fps, 0);
        updater.advance(0.03);
        assert_eq!(updater.stats().fps, 40);
    }

    #[test]
    fn fps_window_carries_overshoot() {
        let mut updater = Updater::new(60);
        updater.advance(0.6);
        updater.advance(0.6);
        assert_eq!(updater.stats().fps, 2);
        // 0.2 s carried over, so the third 0.3 s frame closes the next window
        updater.advance(0.3);
        updater.advance(0.3);
        assert_eq!(updater.stats().fps, 2);
        updater.advance(0.3);
        assert_eq!(updater.stats().fps, 3);
    }
}
