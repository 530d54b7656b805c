mod camera;

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use voxgrid::glam::{IVec3, Vec3};
use voxgrid::{traverse, EditHistory, EditOp, Ray, SetBoxOp, Voxel, VoxelGrid};

use camera::Camera;

#[derive(Parser)]
#[command(name = "gridtool")]
#[command(about = "Voxel grid inspection tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WorldArgs {
    /// Octree depth; the grid spans 2^(depth-1) voxels per edge
    #[arg(short, long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(2..=10))]
    depth: u32,

    /// Phase offset for the terrain height field
    #[arg(long, default_value_t = 0.0)]
    offset: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the generated world to the terminal, one ray per character
    Render {
        #[command(flatten)]
        world: WorldArgs,

        /// Image width in characters
        #[arg(long, default_value_t = 96, value_parser = clap::value_parser!(u32).range(2..))]
        width: u32,

        /// Image height in characters
        #[arg(long, default_value_t = 36, value_parser = clap::value_parser!(u32).range(2..))]
        height: u32,

        /// Camera position as "x,y,z"
        #[arg(long, default_value = "-20,14,-28", value_parser = parse_vec3, allow_hyphen_values = true)]
        position: Vec3,

        /// Camera yaw in degrees
        #[arg(long, default_value_t = 35.0)]
        yaw: f32,

        /// Camera pitch in degrees; positive looks down
        #[arg(long, default_value_t = 20.0)]
        pitch: f32,

        /// Vertical field of view in degrees
        #[arg(long, default_value_t = 60.0)]
        vfov: f32,
    },
    /// Trace one ray through the generated world and report the hit
    Probe {
        #[command(flatten)]
        world: WorldArgs,

        /// Ray origin as "x,y,z"
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        origin: Vec3,

        /// Ray direction as "x,y,z"
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        direction: Vec3,

        /// Maximum ray distance
        #[arg(long, default_value_t = 500.0)]
        length: f32,
    },
    /// Overwrite a box of voxels, then undo and redo it, reporting node churn
    Edit {
        #[command(flatten)]
        world: WorldArgs,

        /// First corner of the box as "x,y,z"
        #[arg(long, value_parser = parse_ivec3, allow_hyphen_values = true)]
        from: IVec3,

        /// Second corner of the box as "x,y,z"
        #[arg(long, value_parser = parse_ivec3, allow_hyphen_values = true)]
        to: IVec3,

        /// Material id to fill with; 0 clears
        #[arg(long, default_value_t = 1)]
        material: u8,
    },
}

/// Parse a Vec3 from "x,y,z"
fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 components, got {}", parts.len()));
    }
    let x = parts[0].parse::<f32>().map_err(|e| e.to_string())?;
    let y = parts[1].parse::<f32>().map_err(|e| e.to_string())?;
    let z = parts[2].parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Vec3::new(x, y, z))
}

/// Parse an IVec3 from "x,y,z"
fn parse_ivec3(s: &str) -> Result<IVec3, String> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 components, got {}", parts.len()));
    }
    let x = parts[0].parse::<i32>().map_err(|e| e.to_string())?;
    let y = parts[1].parse::<i32>().map_err(|e| e.to_string())?;
    let z = parts[2].parse::<i32>().map_err(|e| e.to_string())?;
    Ok(IVec3::new(x, y, z))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            world,
            width,
            height,
            position,
            yaw,
            pitch,
            vfov,
        } => {
            render(&world, width, height, position, yaw, pitch, vfov);
        }
        Commands::Probe {
            world,
            origin,
            direction,
            length,
        } => {
            probe(&world, origin, direction, length);
        }
        Commands::Edit {
            world,
            from,
            to,
            material,
        } => {
            edit(&world, from, to, material)?;
        }
    }

    Ok(())
}

/// Rolling sine terrain: everything at or below the height field is
/// solid, with the material banded by depth below the surface.
fn build_world(args: &WorldArgs) -> VoxelGrid {
    let mut grid = VoxelGrid::new(args.depth);
    let amplitude = grid.side() as f32 / 4.0;
    let wavelength = grid.side() as f32 / 2.0;
    let offset = args.offset;

    grid.fill_with(|coord| {
        let x = coord.x as f32;
        let z = coord.z as f32;
        let height = amplitude * (x / wavelength + offset).sin() * (z / wavelength + offset).cos();
        let below = height - coord.y as f32;
        if below < 0.0 {
            Voxel::EMPTY
        } else if below < 1.0 {
            Voxel(1)
        } else if below < 4.0 {
            Voxel(2)
        } else {
            Voxel(3)
        }
    });
    grid
}

fn render(world: &WorldArgs, width: u32, height: u32, position: Vec3, yaw: f32, pitch: f32, vfov: f32) {
    let grid = build_world(world);
    let camera = Camera {
        position,
        yaw_degrees: yaw,
        pitch_degrees: pitch,
        vfov_degrees: vfov,
    };

    // Closer surfaces get denser characters; misses stay blank.
    const RAMP: &[u8] = b"@%#*+=-:.";
    let max_distance = grid.side() as f32 * 4.0;
    let budget = grid.side() as usize * 4;

    let mut image = String::with_capacity(((width + 1) * height) as usize);
    for y in (0..height).rev() {
        for x in 0..width {
            let ray = camera.ray_for_pixel(x, y, width, height, max_distance);
            let ch = match traverse(&ray, &grid, true, budget) {
                Some(hit) if hit.found_nonempty => {
                    let shade = (hit.distance / max_distance).clamp(0.0, 1.0);
                    let i = ((shade * (RAMP.len() - 1) as f32) as usize).min(RAMP.len() - 1);
                    RAMP[i] as char
                }
                _ => ' ',
            };
            image.push(ch);
        }
        image.push('\n');
    }
    print!("{image}");
}

fn probe(world: &WorldArgs, origin: Vec3, direction: Vec3, length: f32) {
    let grid = build_world(world);
    let ray = Ray::new(origin, direction, length);
    let budget = grid.side() as usize * 4;

    match traverse(&ray, &grid, true, budget) {
        Some(hit) if hit.found_nonempty => {
            println!("hit voxel {} (material {})", hit.voxel_coord, hit.voxel.0);
            println!("  distance {:.3}", hit.distance);
            println!("  point    {}", hit.point);
            match hit.normal {
                Some(axis) => {
                    println!("  normal   {}", axis.as_vec3());
                    // The cell a block edit would place into.
                    let placement = hit.voxel_coord + axis.as_ivec3();
                    if grid.contains(placement) {
                        println!("  placement cell {}", placement);
                    }
                }
                None => println!("  ray starts inside this voxel"),
            }
        }
        Some(hit) => {
            println!("no solid voxel along the ray; walk ended at {}", hit.voxel_coord);
        }
        None => println!("ray never enters the grid"),
    }
}

fn edit(world: &WorldArgs, from: IVec3, to: IVec3, material: u8) -> Result<()> {
    let mut grid = build_world(world);

    let updates = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&updates);
    grid.set_update_hook(move |_| counter.set(counter.get() + 1));

    let op = SetBoxOp::new(from, to, Voxel(material));
    let (min, max) = op.bounds();
    println!("editing box {min}..{max} with material {material}");

    let mut history = EditHistory::default();
    history.execute(&mut grid, EditOp::SetBox(op))?;
    println!("applied: {} interior node updates", updates.get());

    updates.set(0);
    history.undo(&mut grid)?;
    println!("undone:  {} interior node updates", updates.get());

    updates.set(0);
    history.redo(&mut grid)?;
    println!("redone:  {} interior node updates", updates.get());

    Ok(())
}
