//! Accuracy tests for the particle integrators
//!
//! Checks each integrator against closed-form motion in uniform fields:
//! straight lines, gyration, E×B drift, and the expected order of
//! convergence.

use chargedrift::config::SimulationConfig;
use chargedrift::physics::field::{AxisSign, FieldModel};
use chargedrift::physics::force::LorentzAcceleration;
use chargedrift::physics::integrators::{
    AccelerationField, ExplicitEuler, Integrator, RungeKuttaFourthOrder,
    RungeKuttaFourthOrderCoupled,
};
use chargedrift::physics::math::{Scalar, Vector, drift_velocity, validate_circular_motion};
use chargedrift::physics::session::SimulationSession;

const TAU: Scalar = std::f64::consts::TAU;

fn session(dt: Scalar, e: Scalar, e_angle: Scalar, b: Scalar) -> SimulationSession {
    let mut config = SimulationConfig::default();
    config.physics.nominal_frame_duration = dt;
    config.physics.field.electric_magnitude = e;
    config.physics.field.electric_angle_deg = e_angle;
    config.physics.field.magnetic_magnitude = b;
    config.trails.length = "unbounded".parse().unwrap();
    SimulationSession::from_config(&config).unwrap()
}

/// Center and radius of the circle through three points
fn circumcircle(a: Vector, b: Vector, c: Vector) -> (Vector, Scalar) {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    let (a2, b2, c2) = (a.length_squared(), b.length_squared(), c.length_squared());
    let center = Vector::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    (center, center.distance(a))
}

/// Exact velocity after `t` for pure gyration with ω = qBz/m
fn gyrated_velocity(v0: Vector, omega: Scalar, t: Scalar) -> Vector {
    Vector::from_angle(-omega * t).rotate(v0)
}

fn run_velocity(
    integrator: &dyn Integrator,
    field: &dyn AccelerationField,
    v0: Vector,
    dt: Scalar,
    steps: usize,
) -> (Vector, Vector) {
    let mut position = Vector::ZERO;
    let mut velocity = v0;
    for _ in 0..steps {
        integrator.step(&mut position, &mut velocity, field, dt);
    }
    (position, velocity)
}

#[test]
fn test_zero_field_gives_straight_line() {
    let mut session = session(1.0 / 60.0, 0.0, 0.0, 0.0);
    session.add_particle(1.0, 1.0, 3.0, -1.0).unwrap();

    for _ in 0..120 {
        session.tick();
    }

    let particle = &session.particles()[0];
    let expected = Vector::new(3.0, -1.0) * session.simulation_time();
    assert_eq!(particle.velocity(), Vector::new(3.0, -1.0));
    assert!(
        particle.position().distance(expected) < 1e-12,
        "expected {expected}, got {}",
        particle.position()
    );
}

#[test]
fn test_pure_magnetic_field_gives_circle() {
    let mut session = session(1.0 / 60.0, 0.0, 0.0, 1.0);
    session.add_particle(1.0, 1.0, 1.0, 0.0).unwrap();

    for _ in 0..1000 {
        session.tick();
    }

    let particle = &session.particles()[0];
    let speed = particle.velocity().length();
    assert!((speed - 1.0).abs() < 1e-3, "speed drifted to {speed}");

    let trail = particle.trail().to_vec();
    assert_eq!(trail.len(), 1000);
    let (center, radius) = circumcircle(trail[0], trail[100], trail[200]);
    assert!(
        validate_circular_motion(1.0, 1.0, 1.0, 1.0, radius, 1e-3),
        "radius {radius} does not match m·v/(|q|·B)"
    );
    for point in &trail {
        assert!((point.distance(center) - radius).abs() < 1e-3);
    }
}

#[test]
fn test_gyration_direction_follows_charge_sign() {
    let field = FieldModel::new(0.0, 0.0, 1.0, AxisSign::OutOfPlane).unwrap();
    let dt = 1.0 / 60.0;
    let v0 = Vector::new(2.0, 0.0);

    let (_, positive) = run_velocity(
        &RungeKuttaFourthOrder,
        &LorentzAcceleration::new(1.0, 1.0, &field),
        v0,
        dt,
        1,
    );
    let (_, negative) = run_velocity(
        &RungeKuttaFourthOrder,
        &LorentzAcceleration::new(-1.0, 1.0, &field),
        v0,
        dt,
        1,
    );

    let angle = |v: Vector| v.y.atan2(v.x);
    assert!((angle(positive) + dt).abs() < 1e-9);
    assert!((angle(negative) - dt).abs() < 1e-9);
}

#[test]
fn test_single_step_matches_hand_computed_rk4() {
    // q = 1, m = 1, v = (2, 0), Bz = +1, E = 0: a(v) = (vy, -vx)
    let mut session = session(1.0 / 60.0, 0.0, 0.0, 1.0);
    session.add_particle(1.0, 1.0, 2.0, 0.0).unwrap();
    session.tick();

    let dt: Scalar = 1.0 / 60.0;
    let a = |v: Vector| Vector::new(v.y, -v.x);
    let v0 = Vector::new(2.0, 0.0);
    let k1 = a(v0);
    let k2 = a(v0 + k1 * (dt / 2.0));
    let k3 = a(v0 + k2 * (dt / 2.0));
    let k4 = a(v0 + k3 * dt);
    let v1 = v0 + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
    let x1 = v1 * dt;

    let particle = &session.particles()[0];
    assert!(particle.velocity().distance(v1) < 1e-9);
    assert!(particle.position().distance(x1) < 1e-9);

    // Speed is kept and the velocity turns clockwise by B·dt
    assert!((particle.velocity().length() - 2.0).abs() < 1e-9);
    let turned = particle.velocity().y.atan2(particle.velocity().x);
    assert!((turned + dt).abs() < 1e-9);
    assert_eq!(particle.trail().latest(), Some(particle.position()));
}

#[test]
fn test_crossed_fields_drift_at_e_cross_b() {
    // E along +y, Bz = +1: the drift is (Ey/Bz, -Ex/Bz) = (1, 0)
    let steps_per_period = 360;
    let periods = 10;
    let dt = TAU / steps_per_period as Scalar;
    let mut session = session(dt, 1.0, 90.0, 1.0);
    session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();

    let expected = drift_velocity(session.field()).unwrap();
    assert!(expected.distance(Vector::new(1.0, 0.0)) < 1e-12);

    for _ in 0..steps_per_period * periods {
        session.tick();
    }

    let elapsed = session.simulation_time();
    let mean_velocity = session.particles()[0].position() / elapsed;
    assert!(
        mean_velocity.distance(expected) < 1e-3,
        "mean velocity {mean_velocity} differs from drift {expected}"
    );
}

#[test]
fn test_rk4_converges_at_fourth_order() {
    let field = FieldModel::new(0.0, 0.0, 1.0, AxisSign::OutOfPlane).unwrap();
    let acceleration = LorentzAcceleration::new(1.0, 1.0, &field);
    let v0 = Vector::new(1.0, 0.0);
    let exact = gyrated_velocity(v0, 1.0, 1.0);

    let error = |steps: usize| {
        let (_, v) = run_velocity(
            &RungeKuttaFourthOrder,
            &acceleration,
            v0,
            1.0 / steps as Scalar,
            steps,
        );
        v.distance(exact)
    };

    let ratio = error(10) / error(20);
    assert!(
        (12.0..20.0).contains(&ratio),
        "halving dt should cut the error ~16x, got {ratio}"
    );
    assert_eq!(RungeKuttaFourthOrder.convergence_order(), 4);
}

#[test]
fn test_euler_converges_at_first_order() {
    let field = FieldModel::new(0.0, 0.0, 1.0, AxisSign::OutOfPlane).unwrap();
    let acceleration = LorentzAcceleration::new(1.0, 1.0, &field);
    let v0 = Vector::new(1.0, 0.0);
    let exact = gyrated_velocity(v0, 1.0, 1.0);

    let error = |steps: usize| {
        let (_, v) = run_velocity(&ExplicitEuler, &acceleration, v0, 1.0 / steps as Scalar, steps);
        v.distance(exact)
    };

    let ratio = error(100) / error(200);
    assert!(
        (1.6..2.4).contains(&ratio),
        "halving dt should halve the error, got {ratio}"
    );
    assert_eq!(ExplicitEuler.convergence_order(), 1);
}

#[test]
fn test_coupled_rk4_closes_the_orbit() {
    let field = FieldModel::new(0.0, 0.0, 1.0, AxisSign::OutOfPlane).unwrap();
    let acceleration = LorentzAcceleration::new(1.0, 1.0, &field);
    let steps = 100;

    let (position, velocity) = run_velocity(
        &RungeKuttaFourthOrderCoupled,
        &acceleration,
        Vector::new(1.0, 0.0),
        TAU / steps as Scalar,
        steps,
    );

    assert!(position.length() < 1e-5, "orbit ended at {position}");
    assert!(velocity.distance(Vector::new(1.0, 0.0)) < 1e-5);
}
