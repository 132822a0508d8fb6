use anyhow::bail;
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::str::FromStr;
use std::time::Instant;
use surfaces_camera::{Camera, CameraMode, Movement};
use surfaces_common::{DemoConfig, MAX_RESOLUTION, SurfaceKind};
use surfaces_input::{Control, InputState};
use surfaces_surface::SurfaceSampler;
use tracing_subscriber::EnvFilter;

const GOLDEN_EPSILON: f32 = 1e-5;

#[derive(Parser)]
#[command(
    name = "surfaces-cli",
    about = "Headless tool for the surfaces demo: sampling, camera traces, checks"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default configuration
    Info,
    /// Sample one grid cell of a surface
    Sample {
        #[arg(short, long, default_value = "torus")]
        kind: SurfaceKind,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        i: i32,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        j: i32,
        /// Seconds since start
        #[arg(short, long, default_value = "0")]
        t: f32,
        #[arg(short, long, default_value = "400")]
        resolution: u32,
    },
    /// Replay a scripted sequence of camera steps and print the state after each
    Trace {
        /// Steps such as `forward:0.5`, `look:10,-5`, `zoom:2`, `toggle`
        #[arg(required = true, allow_hyphen_values = true)]
        steps: Vec<Step>,
        /// Start in ground-locked mode
        #[arg(long)]
        ground_locked: bool,
    },
    /// Verify reference values for the camera and the torus
    Golden,
    /// Time full-grid transform generation
    Bench {
        #[arg(short, long, default_value = "120")]
        frames: u32,
        #[arg(short, long, default_value = "torus")]
        kind: SurfaceKind,
        #[arg(short, long, default_value = "400")]
        resolution: u32,
    },
}

/// One scripted camera step.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    /// Hold a control for the given number of seconds.
    Hold(Control, f32),
    Look(f32, f32),
    Zoom(f32),
    Toggle,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let number = |text: &str| {
            text.trim()
                .parse::<f32>()
                .map_err(|e| format!("bad number `{text}` in `{s}`: {e}"))
        };
        let seconds = || match arg {
            Some(a) => number(a),
            None => Ok(1.0),
        };

        let control = match name.to_ascii_lowercase().as_str() {
            "forward" | "w" => Some(Control::Forward),
            "backward" | "s" => Some(Control::Backward),
            "left" | "a" => Some(Control::Left),
            "right" | "d" => Some(Control::Right),
            "up" => Some(Control::Up),
            "down" => Some(Control::Down),
            "look" => {
                let Some((dx, dy)) = arg.and_then(|a| a.split_once(',')) else {
                    return Err(format!("`{s}`: look needs `look:dx,dy`"));
                };
                return Ok(Step::Look(number(dx)?, number(dy)?));
            }
            "zoom" => {
                let Some(a) = arg else {
                    return Err(format!("`{s}`: zoom needs `zoom:delta`"));
                };
                return Ok(Step::Zoom(number(a)?));
            }
            "toggle" => return Ok(Step::Toggle),
            _ => None,
        };
        match control {
            Some(control) => Ok(Step::Hold(control, seconds()?)),
            None => Err(format!("unknown step `{s}`")),
        }
    }
}

fn print_camera(label: &str, camera: &Camera) {
    let p = camera.position();
    let f = camera.front();
    println!(
        "{label:<16} pos=({:>8.3}, {:>8.3}, {:>8.3}) front=({:>6.3}, {:>6.3}, {:>6.3}) yaw={:>8.2} pitch={:>6.2} fov={:>5.1} mode={}",
        p.x,
        p.y,
        p.z,
        f.x,
        f.y,
        f.z,
        camera.yaw(),
        camera.pitch(),
        camera.fov(),
        camera.mode()
    );
}

fn run_trace(steps: &[Step], ground_locked: bool) -> Camera {
    let mut camera = Camera::default();
    if ground_locked {
        camera.set_mode(CameraMode::GroundLocked);
    }
    let mut input = InputState::new();
    print_camera("start", &camera);

    for step in steps {
        match *step {
            Step::Hold(control, seconds) => {
                input.set_control(control, true);
                input.apply(&mut camera, seconds);
                input.set_control(control, false);
            }
            Step::Look(dx, dy) => {
                input.mouse_motion(dx, -dy);
                input.apply(&mut camera, 0.0);
            }
            Step::Zoom(delta) => {
                input.scroll(delta);
                input.apply(&mut camera, 0.0);
            }
            Step::Toggle => camera.set_mode(camera.mode().toggled()),
        }
        print_camera(&format!("{step:?}"), &camera);
    }
    camera
}

fn check(name: &str, got: Vec3, want: Vec3) -> bool {
    let ok = got.abs_diff_eq(want, GOLDEN_EPSILON);
    let status = if ok { "ok" } else { "MISMATCH" };
    println!("{status:<8} {name}: got {got:?}, want {want:?}");
    ok
}

fn run_golden() -> anyhow::Result<()> {
    let mut ok = true;

    let camera = Camera::default();
    ok &= check("default front", camera.front(), Vec3::NEG_Z);
    ok &= check("default right", camera.right(), Vec3::X);
    ok &= check("default up", camera.up(), Vec3::Y);

    let mut moved = Camera::new(Vec3::ZERO);
    moved.move_by(Movement::Forward, 0.5);
    ok &= check("forward 0.5s", moved.position(), Vec3::new(0.0, 0.0, -2.0));

    let mut grounded = Camera::with_angles(Vec3::ZERO, Vec3::Y, -90.0, 45.0);
    grounded.set_mode(CameraMode::GroundLocked);
    grounded.move_by(Movement::Forward, 1.0);
    ok &= check("ground-locked y", Vec3::new(0.0, grounded.position().y, 0.0), Vec3::ZERO);

    let torus = SurfaceSampler::new(SurfaceKind::Torus, 400);
    ok &= check("torus (0,0,0)", torus.sample(0, 0, 0.0), Vec3::new(0.0, 0.0, 1.35));
    ok &= check("torus (100,0,0)", torus.sample(100, 0, 0.0), Vec3::new(1.35, 0.0, 0.0));

    let plane = SurfaceSampler::new(SurfaceKind::Plane, 4);
    ok &= check("plane (-2,1,5)", plane.sample(-2, 1, 5.0), Vec3::new(-1.0, 0.0, 0.5));

    if !ok {
        bail!("golden values do not match");
    }
    println!("all golden values match");
    Ok(())
}

fn run_bench(kind: SurfaceKind, resolution: u32, frames: u32) -> anyhow::Result<()> {
    if resolution == 0 || resolution % 2 != 0 {
        bail!("resolution must be even and positive, got {resolution}");
    }
    if resolution > MAX_RESOLUTION {
        bail!("resolution must be at most {MAX_RESOLUTION}, got {resolution}");
    }
    let sampler = SurfaceSampler::new(kind, resolution);
    let mut instances = Vec::with_capacity(sampler.instance_count());

    let start = Instant::now();
    for frame in 0..frames {
        sampler.fill_transforms(frame as f32 / 60.0, &mut instances);
    }
    let elapsed = start.elapsed();

    let per_frame = elapsed.as_secs_f64() / f64::from(frames.max(1));
    println!(
        "{kind} {resolution}x{resolution}: {} instances, {frames} frames in {:.2?} ({:.3} ms/frame)",
        instances.len(),
        elapsed,
        per_frame * 1000.0
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = DemoConfig::default();
            println!("surfaces-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "window: {}x{} \"{}\"",
                config.window.width, config.window.height, config.window.title
            );
            println!(
                "camera: pos={:?} yaw={} pitch={} speed={} sensitivity={} fov={} mode={}",
                config.camera.position,
                config.camera.yaw,
                config.camera.pitch,
                config.camera.speed,
                config.camera.sensitivity,
                config.camera.fov,
                config.camera.mode
            );
            println!(
                "projection: near={} far={}",
                config.projection.near, config.projection.far
            );
            let sampler = SurfaceSampler::from_config(&config.surface);
            let range = sampler.grid_range();
            println!(
                "surface: {} resolution={} grid=[{}, {}) instances={}",
                sampler.kind(),
                sampler.resolution(),
                range.start,
                range.end,
                sampler.instance_count()
            );
            let kinds: Vec<&str> = SurfaceKind::ALL.iter().map(|k| k.as_str()).collect();
            println!("surfaces: {}", kinds.join(", "));
        }
        Commands::Sample {
            kind,
            i,
            j,
            t,
            resolution,
        } => {
            if resolution == 0 || resolution % 2 != 0 {
                bail!("resolution must be even and positive, got {resolution}");
            }
            let sampler = SurfaceSampler::new(kind, resolution);
            if !sampler.grid_range().contains(i) || !sampler.grid_range().contains(j) {
                tracing::warn!(i, j, "cell lies outside the rendered grid");
            }
            let p = sampler.sample(i, j, t);
            let transform = sampler.transform(i, j, t);
            println!("{kind} ({i}, {j}) t={t}: unit=({:.6}, {:.6}, {:.6})", p.x, p.y, p.z);
            println!(
                "  world=({:.3}, {:.3}, {:.3}) scale={}",
                transform.translation.x,
                transform.translation.y,
                transform.translation.z,
                transform.scale
            );
        }
        Commands::Trace {
            steps,
            ground_locked,
        } => {
            run_trace(&steps, ground_locked);
        }
        Commands::Golden => run_golden()?,
        Commands::Bench {
            frames,
            kind,
            resolution,
        } => run_bench(kind, resolution, frames)?,
    }

    Ok(())
}
