mod article;
mod film;
mod genre;
mod person;
mod plot;

pub use article::Article;
pub use film::Film;
pub use genre::Genre;
pub use person::{Actor, Director, Writer};
pub use plot::Plot;
