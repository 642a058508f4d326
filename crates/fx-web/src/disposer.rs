//! DOM attachment for [`Disposable`].
//!
//! The disposer itself lives in `fx-core`; this extension exposes it on
//! an effect's root node as a callable JS property, the conventional hook
//! hosts use to force teardown.

use wasm_bindgen::closure::Closure;
use web_sys as web;

pub use fx_core::disposer::Disposable;

use crate::constants::DISPOSER_PROP;

pub trait DisposableNodeExt {
    fn attach_to_node(&self, node: &web::Element);
}

impl DisposableNodeExt for Disposable {
    fn attach_to_node(&self, node: &web::Element) {
        let this = self.clone();
        let callable = Closure::<dyn Fn()>::new(move || this.dispose());
        crate::dom::set_node_prop(node, DISPOSER_PROP, callable.as_ref());
        // ownership moves to the node; freed when the node is collected
        callable.forget();
    }
}
