pub mod animator;

pub use animator::ViewportAnimator;
