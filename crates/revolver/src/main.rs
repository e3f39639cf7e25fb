//! Command line interface of `revolver`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};

use revolver::pipeline::{self, InterfaceParams, ShadedMesh};
use revolver::visuals::{builtin_color_maps, ColorMap, MeshFormat, SurfaceEmitter};
use revolver::{
    AxisConvention, CommandTemplate, ExtractParams, GapPolicy, GridData, PlaneParams,
    ProcessRunner, QuadMesh, RevolveParams, StitchParams, Timesteps,
};

static ARGS_IO: &str = "Input/output";
static ARGS_GEOM: &str = "Geometry";
static ARGS_SHADING: &str = "Shading";

#[derive(Debug, Parser)]
#[command(name = "revolver", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sweep an interface curve into a 3D surface colored by height
    Revolve(RevolveArgs),
    /// Build a flat colored plane from gridded field samples
    Plane(PlaneArgs),
    /// Run an interface extraction tool over a range of snapshots
    Extract(ExtractArgs),
}

#[derive(Debug, clap::Args)]
struct RevolveArgs {
    /// Interface file with two points per line segment
    #[arg(help_heading = ARGS_IO)]
    input: PathBuf,
    /// Mesh file to write (PLY or OBJ)
    #[arg(help_heading = ARGS_IO, short = 'o', long)]
    output: PathBuf,
    /// Output format, guessed from the output file extension if not given
    #[arg(help_heading = ARGS_IO, long)]
    format: Option<FormatArg>,

    /// Number of angular positions across the half-turn, at least 2
    #[arg(help_heading = ARGS_GEOM, short = 's', long, default_value_t = 64)]
    steps: usize,
    /// Largest coordinate difference at which segment endpoints count as connected
    #[arg(help_heading = ARGS_GEOM, short = 't', long, default_value_t = 0.0)]
    tolerance: f64,
    /// Which input column is the axial coordinate
    #[arg(help_heading = ARGS_GEOM, long, value_enum, default_value_t = AxesArg::AxialFirst)]
    axes: AxesArg,
    /// What to do with discontinuities in the interface
    #[arg(help_heading = ARGS_GEOM, long, value_enum, default_value_t = GapsArg::Skip)]
    gaps: GapsArg,

    /// Color map used for the height gradient
    #[arg(help_heading = ARGS_SHADING, long, default_value = "interface")]
    color_map: String,
}

#[derive(Debug, clap::Args)]
struct PlaneArgs {
    /// Grid data file with columns `axial radial magnitude [r g b a]`
    #[arg(help_heading = ARGS_IO)]
    input: PathBuf,
    /// Mesh file to write (PLY or OBJ)
    #[arg(help_heading = ARGS_IO, short = 'o', long)]
    output: PathBuf,
    /// Output format, guessed from the output file extension if not given
    #[arg(help_heading = ARGS_IO, long)]
    format: Option<FormatArg>,

    /// Place the plane on the negative x side of the axis
    #[arg(help_heading = ARGS_GEOM, long)]
    mirror_x: bool,

    /// Color map for the magnitude column, used when the data has no colors
    #[arg(help_heading = ARGS_SHADING, long, default_value = "heatmap")]
    color_map: String,
}

#[derive(Debug, clap::Args)]
struct ExtractArgs {
    /// Extraction program to run for every snapshot
    #[arg(long)]
    tool: String,
    /// First simulation time to process
    #[arg(long, allow_negative_numbers = true)]
    start: f64,
    /// Simulation time to stop at (excluded)
    #[arg(long, allow_negative_numbers = true)]
    end: f64,
    /// Time between snapshots
    #[arg(long, default_value_t = 0.01)]
    dt: f64,
    /// Snapshot path, `{t}` is replaced with the time
    #[arg(long, default_value = "intermediate/snapshot-{t}")]
    input_pattern: String,
    /// Interface file path, `{t}` is replaced with the time
    #[arg(long, default_value = "intermediate/interface-{t}.dat")]
    output_pattern: String,
    /// Directory to run the tool in
    #[arg(long)]
    working_dir: Option<PathBuf>,
    /// Arguments for the tool, `{input}`, `{output}` and `{t}` are substituted
    /// (default: `{input} {output}`)
    #[arg(last = true)]
    tool_args: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Ply,
    Obj,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AxesArg {
    AxialFirst,
    RadialFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GapsArg {
    Propagate,
    Skip,
    Reject,
}

impl From<FormatArg> for MeshFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Ply => MeshFormat::Ply,
            FormatArg::Obj => MeshFormat::Obj,
        }
    }
}

impl From<AxesArg> for AxisConvention {
    fn from(a: AxesArg) -> Self {
        match a {
            AxesArg::AxialFirst => AxisConvention::AxialFirst,
            AxesArg::RadialFirst => AxisConvention::RadialFirst,
        }
    }
}

impl From<GapsArg> for GapPolicy {
    fn from(g: GapsArg) -> Self {
        match g {
            GapsArg::Propagate => GapPolicy::Propagate,
            GapsArg::Skip => GapPolicy::Skip,
            GapsArg::Reject => GapPolicy::Reject,
        }
    }
}

impl ExtractArgs {
    fn command(&self) -> CommandTemplate {
        if self.tool_args.is_empty() {
            CommandTemplate::new(&self.tool, ["{input}", "{output}"])
        } else {
            CommandTemplate::new(&self.tool, &self.tool_args)
        }
    }
}

impl RevolveArgs {
    fn params(&self) -> InterfaceParams {
        InterfaceParams {
            stitch: StitchParams {
                tolerance: self.tolerance,
                axes: self.axes.into(),
            },
            revolve: RevolveParams {
                steps: self.steps,
                gaps: self.gaps.into(),
            },
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), anyhow::Error> {
    match cli.command {
        Command::Revolve(args) => revolve_cmd(&args),
        Command::Plane(args) => plane_cmd(&args),
        Command::Extract(args) => extract_cmd(&args),
    }
}

fn revolve_cmd(args: &RevolveArgs) -> Result<(), anyhow::Error> {
    let format = output_format(&args.output, args.format)?;
    let color_map = lookup_color_map(&args.color_map)?;

    info!("Revolving interface from {:?}", args.input);
    let shaded = pipeline::load_interface_surface(&args.input, &args.params(), &color_map)
        .with_context(|| format!("Failed to build a surface from {:?}", args.input))?;

    write_mesh(&args.output, format, "revolved_interface", &shaded)
}

fn plane_cmd(args: &PlaneArgs) -> Result<(), anyhow::Error> {
    let format = output_format(&args.output, args.format)?;
    let color_map = lookup_color_map(&args.color_map)?;

    info!("Building plane from {:?}", args.input);
    let data = GridData::load(&args.input)?;
    let params = PlaneParams {
        mirror_x: args.mirror_x,
    };
    let shaded = pipeline::plane_surface(&data, &params, &color_map)
        .with_context(|| format!("Failed to build a plane from {:?}", args.input))?;

    write_mesh(&args.output, format, "field_plane", &shaded)
}

fn extract_cmd(args: &ExtractArgs) -> Result<(), anyhow::Error> {
    let runner = ProcessRunner {
        working_dir: args.working_dir.clone(),
    };
    let params = ExtractParams {
        command: args.command(),
        input_pattern: args.input_pattern.clone(),
        output_pattern: args.output_pattern.clone(),
        timesteps: Timesteps {
            start: args.start,
            end: args.end,
            dt: args.dt,
        },
    };

    let outputs = revolver::extract_interfaces(&runner, &params)
        .with_context(|| format!("Interface extraction with {:?} failed", args.tool))?;
    info!("Successfully extracted {} interfaces.", outputs.len());
    Ok(())
}

fn output_format(path: &Path, explicit: Option<FormatArg>) -> Result<MeshFormat, anyhow::Error> {
    match explicit {
        Some(f) => Ok(f.into()),
        None => MeshFormat::from_path(path).ok_or_else(|| {
            anyhow!("Can't tell the mesh format from {path:?}, use a .ply or .obj extension or --format")
        }),
    }
}

fn lookup_color_map(name: &str) -> Result<ColorMap, anyhow::Error> {
    builtin_color_maps::by_name(name).ok_or_else(|| {
        let names: Vec<String> = builtin_color_maps::all_builtins()
            .into_iter()
            .map(|m| m.name)
            .collect();
        anyhow!("Unknown color map {name:?}, available: {}", names.join(", "))
    })
}

fn write_mesh(
    path: &Path,
    format: MeshFormat,
    name: &str,
    shaded: &ShadedMesh,
) -> Result<(), anyhow::Error> {
    let file = File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
    let mut emitter = format.emitter(BufWriter::new(file));
    emitter
        .emit(&shaded.surface(name))
        .with_context(|| format!("Failed to write mesh to {path:?}"))?;
    info!(
        "Wrote {} vertices and {} faces to {path:?}",
        shaded.mesh.vertex_count(),
        shaded.mesh.face_count()
    );
    info!("{}", describe_extent(&shaded.mesh));
    Ok(())
}

fn describe_extent(mesh: &QuadMesh) -> String {
    let skipped = match mesh.non_finite_vertex_count() {
        0 => String::new(),
        n => format!(" ({n} gap vertices left out)"),
    };
    match mesh.bounds() {
        Some(bounds) => format!(
            "Mesh spans {:?} to {:?}{skipped}",
            bounds.min.as_slice(),
            bounds.max.as_slice()
        ),
        None => format!("Mesh has no finite vertices{skipped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn revolve_args_map_to_params() {
        let cli = Cli::try_parse_from([
            "revolver",
            "revolve",
            "interface-0.95.dat",
            "-o",
            "out.ply",
            "--steps",
            "32",
            "--tolerance",
            "1e-9",
            "--gaps",
            "reject",
        ])
        .unwrap();
        let Command::Revolve(args) = cli.command else {
            panic!("expected the revolve subcommand");
        };
        let params = args.params();
        assert_eq!(params.revolve.steps, 32);
        assert_eq!(params.revolve.gaps, GapPolicy::Reject);
        assert_eq!(params.stitch.tolerance, 1e-9);
        assert_eq!(params.stitch.axes, AxisConvention::AxialFirst);
        assert_eq!(
            output_format(&args.output, args.format).unwrap(),
            MeshFormat::Ply
        );
    }

    #[test]
    fn extract_default_tool_args() {
        let cli = Cli::try_parse_from([
            "revolver", "extract", "--tool", "./restore", "--start", "0.1", "--end", "0.2",
        ])
        .unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected the extract subcommand");
        };
        assert!(args.tool_args.is_empty());
        assert_eq!(args.command().args, ["{input}", "{output}"]);

        let cli = Cli::try_parse_from([
            "revolver", "extract", "--tool", "./restore", "--start", "0.1", "--end", "0.2", "--",
            "{input}", "{output}", "0.5", "1.0",
        ])
        .unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected the extract subcommand");
        };
        assert_eq!(args.command().args, ["{input}", "{output}", "0.5", "1.0"]);
    }

    #[test]
    fn mesh_extent_skips_gaps() {
        let params = RevolveParams {
            steps: 3,
            gaps: GapPolicy::Propagate,
        };
        let mesh = revolver::revolve_coords(&[1., f64::NAN, 2.], &[0., f64::NAN, 1.], &params)
            .unwrap();
        let text = describe_extent(&mesh);
        assert!(text.starts_with("Mesh spans [-2.0, "), "{text}");
        assert!(text.ends_with("(3 gap vertices left out)"), "{text}");

        assert_eq!(
            describe_extent(&QuadMesh::default()),
            "Mesh has no finite vertices"
        );
    }

    #[test]
    fn written_file_matches_format() {
        let points = revolver::parse_points("1 0\n1 1\n").unwrap();
        let shaded = pipeline::interface_surface(
            &points,
            &InterfaceParams::default(),
            &builtin_color_maps::interface(),
        )
        .unwrap();
        let path = std::env::temp_dir().join(format!("revolver-cli-{}.ply", std::process::id()));
        write_mesh(&path, MeshFormat::Ply, "interface", &shaded).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(text.starts_with("ply\n"));
    }

    #[test]
    fn unknown_outputs_are_rejected() {
        assert!(output_format(Path::new("mesh.stl"), None).is_err());
        assert!(output_format(Path::new("mesh.stl"), Some(FormatArg::Obj)).is_ok());
        assert!(lookup_color_map("nope").is_err());
    }
}
