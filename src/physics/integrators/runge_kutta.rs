//! Runge-Kutta integration methods

use super::{AccelerationField, Integrator};
use crate::physics::math::{Scalar, Vector};

/// Fourth-order Runge-Kutta on velocity, followed by one position update
///
/// Because the Lorentz force depends on velocity alone, the four stages only
/// need trial velocities. Position is advanced once, afterwards, with the
/// freshly computed velocity rather than through its own RK4 stages.
///
/// Algorithm, with a(v) = F(q, v, field) / m:
/// 1. k1 = a(v0)
/// 2. k2 = a(v0 + k1*dt/2)
/// 3. k3 = a(v0 + k2*dt/2)
/// 4. k4 = a(v0 + k3*dt)
/// 5. v1 = v0 + dt * (k1 + 2*k2 + 2*k3 + k4) / 6
/// 6. x1 = x0 + v1*dt
///
/// Trajectories of stored scenes depend on this exact arithmetic; the
/// position update must stay decoupled.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl Integrator for RungeKuttaFourthOrder {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(
        &self,
        position: &mut Vector,
        velocity: &mut Vector,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) {
        let v0 = *velocity;

        let k1 = field.at(v0);
        let k2 = field.at(v0 + k1 * (dt / 2.0));
        let k3 = field.at(v0 + k2 * (dt / 2.0));
        let k4 = field.at(v0 + k3 * dt);

        let average_acceleration = (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0;

        *velocity = v0 + average_acceleration * dt;
        *position += *velocity * dt;
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "rk4"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["runge_kutta_4", "runge_kutta_fourth_order"]
    }
}

/// Textbook RK4 on the coupled (position, velocity) state
///
/// Position is integrated from the four stage velocities:
/// x1 = x0 + dt/6 * (v0 + 2*v_k2 + 2*v_k3 + v_k4)
///
/// This is the scheme batch simulations request as "RK4". It differs from
/// [`RungeKuttaFourthOrder`] only in how position is advanced.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrderCoupled;

impl Integrator for RungeKuttaFourthOrderCoupled {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(
        &self,
        position: &mut Vector,
        velocity: &mut Vector,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) {
        // Stage 1
        let k1_x = *velocity;
        let k1_v = field.at(k1_x);

        // Stage 2: midpoint using k1
        let k2_x = *velocity + k1_v * (dt * 0.5);
        let k2_v = field.at(k2_x);

        // Stage 3: midpoint using k2
        let k3_x = *velocity + k2_v * (dt * 0.5);
        let k3_v = field.at(k3_x);

        // Stage 4: endpoint using k3
        let k4_x = *velocity + k3_v * dt;
        let k4_v = field.at(k4_x);

        *position += (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * (dt / 6.0);
        *velocity += (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0);
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "rk4_coupled"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["RK4"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantAcceleration(Vector);

    impl AccelerationField for ConstantAcceleration {
        fn at(&self, _velocity: Vector) -> Vector {
            self.0
        }
    }

    /// a(v) = (vy, -vx): unit-frequency clockwise gyration
    struct Gyration;

    impl AccelerationField for Gyration {
        fn at(&self, velocity: Vector) -> Vector {
            Vector::new(velocity.y, -velocity.x)
        }
    }

    #[test]
    fn test_rk4_constant_acceleration() {
        let rk4 = RungeKuttaFourthOrder;
        let mut position = Vector::new(1.0, 0.0);
        let mut velocity = Vector::new(0.0, 1.0);
        let field = ConstantAcceleration(Vector::new(0.0, -9.81));
        let dt = 0.01;

        rk4.step(&mut position, &mut velocity, &field, dt);

        // All stages agree for constant acceleration, so v1 = v0 + a*dt
        assert!((velocity - Vector::new(0.0, 0.9019)).length() < 1e-12);

        // Position uses the new velocity: x1 = x0 + v1*dt
        let expected_pos = Vector::new(1.0, 0.009019);
        assert!(
            (position - expected_pos).length() < 1e-12,
            "Position should use the updated velocity, got {:?}",
            position
        );
    }

    #[test]
    fn test_rk4_matches_hand_computed_stages() {
        let rk4 = RungeKuttaFourthOrder;
        let mut position = Vector::ZERO;
        let mut velocity = Vector::new(2.0, 0.0);
        let dt = 0.1;

        rk4.step(&mut position, &mut velocity, &Gyration, dt);

        let v0 = Vector::new(2.0, 0.0);
        let k1 = Vector::new(v0.y, -v0.x);
        let v2 = v0 + k1 * (dt / 2.0);
        let k2 = Vector::new(v2.y, -v2.x);
        let v3 = v0 + k2 * (dt / 2.0);
        let k3 = Vector::new(v3.y, -v3.x);
        let v4 = v0 + k3 * dt;
        let k4 = Vector::new(v4.y, -v4.x);
        let v1 = v0 + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0 * dt;

        assert_eq!(velocity, v1);
        assert_eq!(position, v1 * dt);
    }

    #[test]
    fn test_rk4_preserves_speed_under_gyration() {
        let rk4 = RungeKuttaFourthOrder;
        let mut position = Vector::ZERO;
        let mut velocity = Vector::new(3.0, 4.0);

        for _ in 0..1000 {
            rk4.step(&mut position, &mut velocity, &Gyration, 0.01);
        }

        assert!((velocity.length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_coupled_rk4_position_uses_stage_velocities() {
        let integrator = RungeKuttaFourthOrderCoupled;
        let mut position = Vector::new(1.0, 0.0);
        let mut velocity = Vector::new(0.0, 1.0);
        let field = ConstantAcceleration(Vector::new(0.0, -9.81));
        let dt = 0.01;

        integrator.step(&mut position, &mut velocity, &field, dt);

        // Constant acceleration: x1 = x0 + v0*dt + a*dt²/2 exactly
        assert!((velocity - Vector::new(0.0, 0.9019)).length() < 1e-12);
        let expected_pos = Vector::new(1.0, 0.01 - 0.5 * 9.81 * dt * dt);
        assert!((position - expected_pos).length() < 1e-12);
    }

    #[test]
    fn test_coupled_and_decoupled_share_velocity_update() {
        let mut p_a = Vector::ZERO;
        let mut v_a = Vector::new(1.0, -2.0);
        let mut p_b = Vector::ZERO;
        let mut v_b = Vector::new(1.0, -2.0);

        for _ in 0..100 {
            RungeKuttaFourthOrder.step(&mut p_a, &mut v_a, &Gyration, 0.05);
            RungeKuttaFourthOrderCoupled.step(&mut p_b, &mut v_b, &Gyration, 0.05);
        }

        assert!((v_a - v_b).length() < 1e-12);
        assert!((p_a - p_b).length() > 1e-6);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(RungeKuttaFourthOrder.name(), "rk4");
        assert_eq!(RungeKuttaFourthOrder.convergence_order(), 4);
        assert_eq!(RungeKuttaFourthOrderCoupled.name(), "rk4_coupled");
        assert!(RungeKuttaFourthOrderCoupled.aliases().contains(&"RK4"));
    }
}
