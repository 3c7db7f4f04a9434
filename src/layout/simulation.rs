use tracing::trace;

use super::LayoutNode;
use super::config::LayoutConfig;

/// Contributes to node velocities (or, for translation-style forces,
/// positions) once per tick. `alpha` is the current simulation energy.
pub trait Force {
    fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f32);
}

/// Runs after integration and may move nodes directly.
pub trait Constraint {
    fn constrain(&mut self, nodes: &mut [LayoutNode]);
}

/// Turns accumulated velocities into positions.
pub trait Integrator {
    fn integrate(&self, nodes: &mut [LayoutNode], dt: f32);
}

/// Velocity damping integrator: `v *= 1 - decay; x += v * dt`. Pinned nodes
/// snap to their pin and lose all velocity.
#[derive(Clone, Copy, Debug)]
pub struct VelocityDecay {
    pub decay: f32,
}

impl Integrator for VelocityDecay {
    fn integrate(&self, nodes: &mut [LayoutNode], dt: f32) {
        let retain = 1.0 - self.decay.clamp(0.0, 1.0);
        for node in nodes {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = eframe::egui::Vec2::ZERO;
            } else {
                node.velocity *= retain;
                node.position += node.velocity * dt;
            }
        }
    }
}

pub type TickListener = Box<dyn FnMut(&[LayoutNode])>;

pub struct Simulation {
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    forces: Vec<(String, Box<dyn Force>)>,
    constraints: Vec<(String, Box<dyn Constraint>)>,
    integrator: Box<dyn Integrator>,
    tick_listeners: Vec<TickListener>,
}

impl Simulation {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            alpha: 1.0,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            alpha_target: 0.0,
            forces: Vec::new(),
            constraints: Vec::new(),
            integrator: Box::new(VelocityDecay {
                decay: config.velocity_decay,
            }),
            tick_listeners: Vec::new(),
        }
    }

    pub fn with_integrator(mut self, integrator: impl Integrator + 'static) -> Self {
        self.integrator = Box::new(integrator);
        self
    }

    /// Registers `force` under `name`, replacing any force already using it.
    pub fn add_force(&mut self, name: impl Into<String>, force: impl Force + 'static) -> &mut Self {
        let name = name.into();
        let force: Box<dyn Force> = Box::new(force);
        if let Some(slot) = self.forces.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = force;
        } else {
            self.forces.push((name, force));
        }
        self
    }

    pub fn remove_force(&mut self, name: &str) -> bool {
        let before = self.forces.len();
        self.forces.retain(|(existing, _)| existing != name);
        self.forces.len() != before
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: impl Constraint + 'static,
    ) -> &mut Self {
        let name = name.into();
        let constraint: Box<dyn Constraint> = Box::new(constraint);
        if let Some(slot) = self
            .constraints
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            slot.1 = constraint;
        } else {
            self.constraints.push((name, constraint));
        }
        self
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
        self.constraints.clear();
    }

    pub fn force_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.forces.iter().map(|(name, _)| name.as_str())
    }

    pub fn on_tick(&mut self, listener: impl FnMut(&[LayoutNode]) + 'static) {
        self.tick_listeners.push(Box::new(listener));
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.alpha_min
    }

    /// Advances one tick: decay alpha, apply forces, integrate, constrain,
    /// then notify tick listeners.
    pub fn step(&mut self, nodes: &mut [LayoutNode], dt: f32) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for (_name, force) in &mut self.forces {
            force.apply(nodes, self.alpha);
        }

        self.integrator.integrate(nodes, dt);

        for (_name, constraint) in &mut self.constraints {
            constraint.constrain(nodes);
        }

        for listener in &mut self.tick_listeners {
            listener(nodes);
        }

        trace!(alpha = self.alpha, nodes = nodes.len(), "simulation tick");
    }
}
