//! Arabic user-facing message table.
//!
//! The UI is RTL Arabic; every surfaced error or confirmation resolves
//! through this table with a generic fallback. Keep strings here, not
//! scattered through call sites.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    NetworkFailure,
    ServerError,
    RequestFailed,
    SessionExpired,
    ValidationFailed,
    PartialFailure,
    FileTooLarge,
    UnsupportedFileType,
    EmptySelection,
    ConfirmDelete,
    ConfirmBulkDelete,
    UploadComplete,
    DeleteComplete,
    Unexpected,
}

pub fn message_for(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::NetworkFailure => {
            "فشل الاتصال بالخادم، يرجى التحقق من اتصال الإنترنت والمحاولة مرة أخرى"
        }
        MessageKind::ServerError => "حدث خطأ في الخادم، يرجى المحاولة مرة أخرى لاحقاً",
        MessageKind::RequestFailed => "تعذر تنفيذ الطلب، يرجى المحاولة مرة أخرى",
        MessageKind::SessionExpired => "انتهت صلاحية الجلسة، يرجى إعادة تحميل الصفحة",
        MessageKind::ValidationFailed => "البيانات المدخلة غير صحيحة، يرجى مراجعتها",
        MessageKind::PartialFailure => "اكتملت العملية جزئياً، فشلت بعض العناصر",
        MessageKind::FileTooLarge => "حجم الملف يتجاوز الحد المسموح (15 ميجابايت)",
        MessageKind::UnsupportedFileType => "نوع الملف غير مدعوم",
        MessageKind::EmptySelection => "يرجى اختيار مستند واحد على الأقل",
        MessageKind::ConfirmDelete => "هل أنت متأكد من حذف هذا المستند؟",
        MessageKind::ConfirmBulkDelete => "هل أنت متأكد من حذف المستندات المحددة؟",
        MessageKind::UploadComplete => "تم رفع الملفات بنجاح",
        MessageKind::DeleteComplete => "تم الحذف بنجاح",
        MessageKind::Unexpected => "حدث خطأ غير متوقع",
    }
}
