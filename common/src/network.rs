/// Reports whether the device currently has network connectivity.
///
/// To be implemented for each platform (WiFi station on the device, a dummy on the desktop).
pub trait NetworkStatus {
    fn is_connected(&self) -> bool;
}

impl<T: NetworkStatus + ?Sized> NetworkStatus for &T {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}
