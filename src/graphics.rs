use diffdrive_kinematics::Pose;
use diffdrive_navigation::Path;
use macroquad::prelude::*;
use tracing::info;

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "diffdrive".to_string(),
        window_width: 800,
        window_height: 800,
        high_dpi: true,
        ..Default::default()
    }
}

const MARGIN: f32 = 40.0; // pixels
const ROBOT_SIZE: f32 = 12.0; // pixels

/// World-to-screen mapping that fits the path and trajectory in the window.
struct View {
    min_x: f64,
    min_y: f64,
    scale: f32,
}

impl View {
    fn fit(path: &Path, history: &[Pose]) -> Self {
        let xs = path.iter().map(|p| p.x).chain(history.iter().map(|p| p.x));
        let ys = path.iter().map(|p| p.y).chain(history.iter().map(|p| p.y));
        let (min_x, max_x) = xs.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (min_y, max_y) = ys.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let span = (max_x - min_x).max(max_y - min_y).max(1e-3) as f32;
        let usable = screen_width().min(screen_height()) - 2.0 * MARGIN;
        View {
            min_x,
            min_y,
            scale: usable / span,
        }
    }

    fn to_screen(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(
            MARGIN + (x - self.min_x) as f32 * self.scale,
            screen_height() - MARGIN - (y - self.min_y) as f32 * self.scale,
        )
    }
}

fn draw_polyline(points: impl Iterator<Item = Vec2>, thickness: f32, color: Color) {
    let mut prev: Option<Vec2> = None;
    for p in points {
        if let Some(q) = prev {
            draw_line(q.x, q.y, p.x, p.y, thickness, color);
        }
        prev = Some(p);
    }
}

fn draw_robot(view: &View, pose: &Pose) {
    let c = view.to_screen(pose.x, pose.y);
    // Screen y grows downwards.
    let th = -pose.theta as f32;
    let corner = |offset: f32| {
        Vec2::new(
            c.x + ROBOT_SIZE * (th + offset).cos(),
            c.y + ROBOT_SIZE * (th + offset).sin(),
        )
    };
    let p1 = corner(0.0);
    let p2 = corner(2.0 * std::f32::consts::PI / 3.0);
    let p3 = corner(-2.0 * std::f32::consts::PI / 3.0);
    draw_triangle(p1, p2, p3, BLUE);
    draw_line(c.x, c.y, p1.x, p1.y, 2.0, DARKBLUE);
}

/// Replays the recorded trajectory in real time over the reference path,
/// looping until the window is closed or Escape is pressed.
pub async fn run_visualization_loop(path: Path, history: Vec<Pose>, dt: f64) {
    info!(poses = history.len(), "Visualization loop starting");
    let mut elapsed = 0.0_f64;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        elapsed += get_frame_time() as f64;
        let index = ((elapsed / dt) as usize) % history.len();

        clear_background(LIGHTGRAY);
        let view = View::fit(&path, &history);

        draw_polyline(path.iter().map(|p| view.to_screen(p.x, p.y)), 1.0, DARKGRAY);
        draw_polyline(
            history[..=index].iter().map(|p| view.to_screen(p.x, p.y)),
            2.0,
            RED,
        );
        let pose = &history[index];
        draw_robot(&view, pose);

        draw_text(
            &format!("t={:.2}s  x={:.2} y={:.2} th={:.2}", index as f64 * dt, pose.x, pose.y, pose.theta),
            10.0,
            20.0,
            20.0,
            BLACK,
        );
        draw_text("path: grey  trajectory: red  (Esc to quit)", 10.0, 40.0, 20.0, BLACK);

        next_frame().await
    }
}

