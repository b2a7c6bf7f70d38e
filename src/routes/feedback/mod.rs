mod handler;
pub mod model;

pub use handler::{
    add,
    add_form,
    delete,
    update,
    update_form,
};
