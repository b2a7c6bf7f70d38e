mod handler;
pub mod model;

pub use handler::{
    delete_user,
    index,
    login,
    login_form,
    logout,
    register,
    register_form,
    show_user,
};
