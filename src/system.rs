use crate::render::Renderer;

/// Hooks a host scheduler calls once per frame.
pub trait System {
    fn update(&mut self, dt: f32) {
        let _ = dt;
    }

    fn render(&mut self, renderer: &mut dyn Renderer<Error = String>) -> Result<(), String>;
}
