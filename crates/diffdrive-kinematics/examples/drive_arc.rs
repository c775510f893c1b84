use diffdrive_kinematics::*;

fn main() {
    let wheel_radius = 0.05;
    let wheel_base = 0.3;
    let kinematics_result = DifferentialDrive::new(wheel_radius, wheel_base);

    let mut euler_pose = Pose::new(0.0, 0.0, 0.0);
    let mut rk4_pose = euler_pose;
    let chassis_speeds = ChassisSpeeds::new(1.0, 0.5); // 1.0 m/s forward, 0.5 rad/s turning
    let dt = 0.1; // Time step in seconds
    let num_steps = 20;

    match kinematics_result {
        Ok(kinematics) => {
            let wheels = kinematics.wheels_from_body(chassis_speeds);
            println!("Initializing simulation...");
            println!("  {}", kinematics);
            println!("  Chassis speeds: {}", chassis_speeds);
            println!("  Wheel speeds:   {}", wheels);
            println!("  Time step: {} s, steps: {}", dt, num_steps);
            println!();

            for i in 0..num_steps {
                let euler = kinematics.update_pose(euler_pose, chassis_speeds, dt, Integrator::Euler);
                let rk4 = kinematics.update_pose(rk4_pose, chassis_speeds, dt, Integrator::Rk4);
                match (euler, rk4) {
                    (Ok(e), Ok(r)) => {
                        euler_pose = e;
                        rk4_pose = r;
                        println!("Step {:>2}: euler {}  rk4 {}", i + 1, euler_pose, rk4_pose);
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        eprintln!("Error during simulation step {}: {}", i + 1, e);
                        break;
                    }
                }
            }

            println!();
            println!("Euler/RK4 drift: {:.4} m", euler_pose.distance_to(&rk4_pose));
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {}", e);
        }
    }
}
