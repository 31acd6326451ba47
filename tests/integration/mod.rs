mod auth_tests;
mod fme_server_tests;
mod qgis_tests;
