mod company_profile;

pub use company_profile::CompanyProfile;
