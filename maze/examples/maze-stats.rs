use std::{fs::read_to_string, path::PathBuf, sync::Arc};

use anyhow::{bail, Context};
use clap::Parser;
use simple_logger::SimpleLogger;

use mazegen::{
    BasicOrder, BuildState, Builder, Direction, DistanceField, Factory, MazeConfiguration,
    PartialConfig,
};

#[derive(Debug, Parser)]
struct Args {
    /// Configuration file for the factory
    #[clap(short)]
    config: Option<PathBuf>,
    /// Skill level of the maze
    #[clap(short, long, default_value_t = 1)]
    skill: u8,
    /// Algorithm building the spanning tree
    #[clap(short, long, value_enum, default_value_t = Builder::Kruskal)]
    builder: Builder,
    /// Carve rooms, adding loops to the maze
    #[clap(long)]
    imperfect: bool,
    /// Draw the maze
    #[clap(long)]
    draw: bool,
    #[clap(flatten)]
    overrides: PartialConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .without_timestamps()
        .with_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .env()
        .init()
        .context("While initializing logging")?;

    let Args {
        config,
        skill,
        builder,
        imperfect,
        draw,
        overrides,
    } = Args::parse();
    let config: PartialConfig = config
        .map(|path| {
            read_to_string(path)
                .context("Cannot read config file")
                .and_then(|s| toml::from_str(&s).context("Cannot parse config file"))
        })
        .transpose()
        .context("While loading configs")?
        .unwrap_or_default();
    let config = config.merge(overrides).or_defaults();

    let factory = Factory::new(config);
    let order = Arc::new(BasicOrder::new(skill, !imperfect, builder));
    factory
        .order(order.clone())
        .context("Cannot order the maze")?;
    match factory.delivered().await {
        BuildState::Delivered => (),
        state => bail!("The maze was not delivered: {state:?}"),
    }
    let Some(maze) = order.configuration() else {
        bail!("Delivered order without a maze")
    };

    println!("size:        {}x{}", maze.width(), maze.height());
    println!("exit:        {:?}", maze.exit_position());
    println!("entrance:    {:?}", maze.grid().entrance());
    println!("start:       {:?}", maze.start_position());
    println!("longest run: {}", maze.distances().max_distance());
    println!("passages:    {}", maze.grid().open_internal_walls().count());
    println!(
        "room cells:  {}",
        maze.grid()
            .domain()
            .into_iter()
            .filter(|[x, y]| maze.grid().is_in_room(*x, *y))
            .count()
    );
    println!("isolated:    {}", maze.isolated_cells());
    if draw {
        print!("{}", render(maze));
    }
    Ok(())
}

/// Plain text drawing, one character per cell and per wall
fn render(maze: &MazeConfiguration) -> String {
    let grid = maze.grid();
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            out.push('+');
            out.push(if grid.has_wall(x, y, Direction::North) {
                '-'
            } else {
                ' '
            });
        }
        out.push_str("+\n");
        for x in 0..grid.width() {
            out.push(if grid.has_wall(x, y, Direction::West) {
                '|'
            } else {
                ' '
            });
            out.push(if [x, y] == maze.exit_position() {
                'X'
            } else if [x, y] == maze.start_position() {
                'S'
            } else if maze.distance_to_exit(x, y) == DistanceField::INFINITY {
                '#'
            } else if grid.is_in_room(x, y) {
                '.'
            } else {
                ' '
            });
        }
        let last = grid.width() - 1;
        out.push(if grid.has_wall(last, y, Direction::East) {
            '|'
        } else {
            ' '
        });
        out.push('\n');
    }
    let last = grid.height() - 1;
    for x in 0..grid.width() {
        out.push('+');
        out.push(if grid.has_wall(x, last, Direction::South) {
            '-'
        } else {
            ' '
        });
    }
    out.push_str("+\n");
    out
}
