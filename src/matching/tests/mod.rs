mod common;
mod gate;
mod hybrid;
mod routing;
