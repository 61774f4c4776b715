mod complaint_dto;

pub use complaint_dto::{
    ComplaintDto, ComplaintFormFields, CreateComplaintDto, CreateComplaintForm, UploadedFile,
};
