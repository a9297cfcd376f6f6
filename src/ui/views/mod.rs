mod catalog;
mod product_detail;
mod results;
mod sale_detail;
mod sales;

pub use catalog::CatalogView;
pub use product_detail::ProductDetailView;
pub use results::ProductResultsView;
pub use sale_detail::SaleDetailView;
pub use sales::SalesView;

#[cfg(test)]
pub(crate) mod testing {
  use crate::catalog::{RemoteClient, Repository, Storefront};
  use crate::ui::view::View;
  use std::sync::Arc;
  use std::time::Duration;

  /// A store whose API address refuses connections, so every call falls back.
  pub fn offline_store() -> Arc<Storefront> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RemoteClient::new(&format!("http://{}/api/v1", addr), Duration::from_secs(2)).unwrap();
    Arc::new(Repository::new(client))
  }

  /// Tick the view the way the event loop does until `done` holds.
  pub async fn tick_until<V: View>(view: &mut V, done: impl Fn(&V) -> bool) {
    for _ in 0..300 {
      view.tick();
      if done(&*view) {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("view did not settle");
  }
}
