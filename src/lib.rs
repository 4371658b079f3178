//! **mazeforge** generates perfect and braided mazes on rectangular grids and renders them
//! as text, step distance grids or images.
//!
//! ```no_run
//! use mazeforge::maze::{generate_maze, Rendering};
//! use mazeforge::settings::{MazeOptions, OutputMode};
//! use mazeforge::units::{Height, Width};
//!
//! let options = MazeOptions::new(Width(10), Height(6)).with_seed(7);
//! if let Ok(Rendering::List(rows)) = generate_maze(&options, &OutputMode::List) {
//!     println!("{}", mazeforge::renderers::rows_to_string(&rows));
//! }
//! ```

pub mod braiding;
pub mod cells;
pub mod colours;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_iterators;
pub mod maze;
pub mod pathing;
pub mod placement;
pub mod renderers;
pub mod settings;
pub mod units;
pub mod utils;

pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::maze::{generate_maze, Maze, Rendering};
